//! Digital output pins
//!
//! Drives a Raspberry Pi header pin, addressed by its BCM number, through
//! `rppal`'s GPIO character device access. Released pins are reset to the
//! mode they had before they were claimed.

use fandriver_core::{FanDriverError, PinLevel, Result};
use rppal::gpio::{Gpio, Level, OutputPin};
use std::collections::HashMap;
use tracing::debug;

/// Trait for digital output abstraction
///
/// Calls are synchronous so that release can run from `Drop`; pin operations
/// are short local writes.
pub trait PinActuator: Send {
    /// Claim `pin`, switch it to output mode, and drive `level` immediately.
    fn initialize(&mut self, pin: u32, level: PinLevel) -> Result<()>;

    /// Set the output level of a claimed pin.
    fn write(&mut self, pin: u32, level: PinLevel) -> Result<()>;

    /// Free the resources claimed for `pin`.
    ///
    /// Idempotent: releasing a pin that is not claimed returns `Ok(())`.
    fn release(&mut self, pin: u32) -> Result<()>;
}

/// GPIO driver for the Raspberry Pi header
///
/// The GPIO controller is opened on the first `initialize`, so constructing
/// the driver never touches hardware.
#[derive(Default)]
pub struct RppalGpio {
    gpio: Option<Gpio>,
    claimed: HashMap<u32, OutputPin>,
}

impl RppalGpio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `pin` is currently claimed by this driver
    pub fn is_claimed(&self, pin: u32) -> bool {
        self.claimed.contains_key(&pin)
    }

    fn controller(&mut self, pin: u32) -> Result<Gpio> {
        if let Some(gpio) = &self.gpio {
            return Ok(gpio.clone());
        }

        let gpio = Gpio::new().map_err(|e| FanDriverError::PinSetup {
            pin,
            reason: format!("GPIO unavailable: {}", e),
        })?;
        self.gpio = Some(gpio.clone());
        Ok(gpio)
    }
}

/// BCM numbers fit in a byte; anything larger cannot name a header pin.
fn bcm_number(pin: u32) -> Result<u8> {
    u8::try_from(pin).map_err(|_| FanDriverError::PinSetup {
        pin,
        reason: "not a valid BCM pin number".to_string(),
    })
}

fn to_level(level: PinLevel) -> Level {
    match level {
        PinLevel::Low => Level::Low,
        PinLevel::High => Level::High,
    }
}

impl PinActuator for RppalGpio {
    fn initialize(&mut self, pin: u32, level: PinLevel) -> Result<()> {
        let bcm = bcm_number(pin)?;
        // Dropping a previous claim resets the line before it is reconfigured
        self.claimed.remove(&pin);

        let gpio = self.controller(pin)?;
        let line = gpio.get(bcm).map_err(|e| FanDriverError::PinSetup {
            pin,
            reason: e.to_string(),
        })?;

        // Output mode and initial level in one step
        let mut output = match level {
            PinLevel::Low => line.into_output_low(),
            PinLevel::High => line.into_output_high(),
        };
        output.set_reset_on_drop(true);

        self.claimed.insert(pin, output);
        debug!("Pin {} configured as output, initial level {}", pin, level);
        Ok(())
    }

    fn write(&mut self, pin: u32, level: PinLevel) -> Result<()> {
        let output = self
            .claimed
            .get_mut(&pin)
            .ok_or_else(|| FanDriverError::PinWrite {
                pin,
                level,
                reason: "pin is not initialized".to_string(),
            })?;

        output.write(to_level(level));
        Ok(())
    }

    fn release(&mut self, pin: u32) -> Result<()> {
        if self.claimed.remove(&pin).is_some() {
            debug!("Pin {} released", pin);
        }
        Ok(())
    }
}
