//! Two-threshold hysteresis rule
//!
//! The fan is switched on above `temp_max` and off below `temp_min`. Readings
//! inside the band `(temp_min, temp_max)`, or exactly on a threshold, keep the
//! current state, so a temperature hovering around one threshold cannot make
//! the fan chatter.

use crate::error::{FanDriverError, Result};
use crate::types::{Celsius, PinState};

/// Validated pair of switching thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    temp_min: Celsius,
    temp_max: Celsius,
}

impl Thresholds {
    /// Create thresholds, rejecting non-finite values and an empty band.
    pub fn new(temp_min: Celsius, temp_max: Celsius) -> Result<Self> {
        if !temp_min.is_finite() || !temp_max.is_finite() {
            return Err(FanDriverError::Config(format!(
                "Thresholds must be finite numbers (temp_min={}, temp_max={})",
                temp_min, temp_max
            )));
        }
        if temp_min >= temp_max {
            return Err(FanDriverError::Config(format!(
                "temp_min ({}) must be below temp_max ({})",
                temp_min, temp_max
            )));
        }
        Ok(Self { temp_min, temp_max })
    }

    pub fn temp_min(&self) -> Celsius {
        self.temp_min
    }

    pub fn temp_max(&self) -> Celsius {
        self.temp_max
    }

    /// Compute the state that should follow `current` for reading `temp`.
    pub fn next_state(&self, current: PinState, temp: Celsius) -> PinState {
        match current {
            PinState::Disengaged if temp > self.temp_max => PinState::Engaged,
            PinState::Engaged if temp < self.temp_min => PinState::Disengaged,
            unchanged => unchanged,
        }
    }
}
