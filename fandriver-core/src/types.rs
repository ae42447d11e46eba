//! Core types for the fan driver

use serde::{Deserialize, Serialize};
use std::fmt;

/// Temperature in degrees Celsius
pub type Celsius = f32;

/// Logical on/off state of the controlled fan.
///
/// Starts out [`PinState::Disengaged`] and only changes through the
/// hysteresis evaluation in the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinState {
    /// Fan unpowered
    #[default]
    Disengaged,
    /// Fan powered
    Engaged,
}

impl PinState {
    /// Physical output level driving this state
    pub fn level(self) -> PinLevel {
        match self {
            PinState::Disengaged => PinLevel::Low,
            PinState::Engaged => PinLevel::High,
        }
    }

    /// Get a string representation for log output
    pub fn as_str(&self) -> &'static str {
        match self {
            PinState::Disengaged => "disengaged",
            PinState::Engaged => "engaged",
        }
    }
}

impl fmt::Display for PinState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical output level of a digital pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinLevel {
    Low,
    High,
}

impl PinLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PinLevel::Low => "low",
            PinLevel::High => "high",
        }
    }
}

impl From<PinState> for PinLevel {
    fn from(state: PinState) -> Self {
        state.level()
    }
}

impl fmt::Display for PinLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
