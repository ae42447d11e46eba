//! Scoped pin ownership
//!
//! A [`PinGuard`] pairs every successful `initialize` with exactly one
//! `release`, on every exit path including errors and panics unwinding
//! through the control loop.

use crate::gpio::PinActuator;
use fandriver_core::{PinLevel, Result};
use tracing::{debug, warn};

/// Owns an actuator together with the pin it currently holds
pub struct PinGuard<A: PinActuator> {
    actuator: A,
    pin: u32,
    held: bool,
}

impl<A: PinActuator> PinGuard<A> {
    /// Claim `pin` on `actuator` and drive `level` on it.
    ///
    /// On failure nothing is held and the actuator is dropped.
    pub fn acquire(mut actuator: A, pin: u32, level: PinLevel) -> Result<Self> {
        actuator.initialize(pin, level)?;
        debug!("Acquired pin {} at level {}", pin, level);
        Ok(Self {
            actuator,
            pin,
            held: true,
        })
    }

    /// Pin this guard was last asked to hold
    pub fn pin(&self) -> u32 {
        self.pin
    }

    /// Set the output level of the held pin
    pub fn write(&mut self, level: PinLevel) -> Result<()> {
        self.actuator.write(self.pin, level)
    }

    /// Release the held pin, then claim `pin` at `level`.
    ///
    /// If the new claim fails the guard holds nothing and a later drop is a
    /// no-op.
    pub fn reacquire(&mut self, pin: u32, level: PinLevel) -> Result<()> {
        self.release_held();
        self.pin = pin;
        self.actuator.initialize(pin, level)?;
        self.held = true;
        debug!("Re-acquired pin {} at level {}", pin, level);
        Ok(())
    }

    /// Release the held pin now and report how it went.
    ///
    /// Returns `Ok(false)` when nothing was held. The pin is considered
    /// released even on error, so dropping the guard afterwards does nothing.
    pub fn release(mut self) -> Result<bool> {
        if !self.held {
            return Ok(false);
        }
        self.held = false;
        self.actuator.release(self.pin)?;
        debug!("Released pin {}", self.pin);
        Ok(true)
    }

    fn release_held(&mut self) {
        if !self.held {
            return;
        }
        self.held = false;
        match self.actuator.release(self.pin) {
            Ok(()) => debug!("Released pin {}", self.pin),
            Err(e) => warn!("{}", e),
        }
    }
}

impl<A: PinActuator> Drop for PinGuard<A> {
    fn drop(&mut self) {
        self.release_held();
    }
}
