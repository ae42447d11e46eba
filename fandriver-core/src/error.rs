//! Error types for the fandriver system

use crate::types::PinLevel;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for fandriver operations
#[derive(Error, Debug)]
pub enum FanDriverError {
    /// Malformed or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Temperature could not be read or parsed
    #[error("Sensor unavailable at {}: {reason}", path.display())]
    SensorUnavailable { path: PathBuf, reason: String },

    /// Pin could not be claimed or put in output mode
    #[error("Failed to set up pin {pin}: {reason}")]
    PinSetup { pin: u32, reason: String },

    /// Output level could not be written
    #[error("Failed to write {level} to pin {pin}: {reason}")]
    PinWrite {
        pin: u32,
        level: PinLevel,
        reason: String,
    },

    /// Claimed pin could not be freed
    #[error("Failed to release pin {pin}: {reason}")]
    PinRelease { pin: u32, reason: String },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for fandriver operations
pub type Result<T> = std::result::Result<T, FanDriverError>;

impl From<serde_json::Error> for FanDriverError {
    fn from(err: serde_json::Error) -> Self {
        FanDriverError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for FanDriverError {
    fn from(err: toml::de::Error) -> Self {
        FanDriverError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: FanDriverError = json_err.into();

        match err {
            FanDriverError::Serialization(msg) => {
                assert!(!msg.is_empty());
            }
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FanDriverError = io_err.into();

        match err {
            FanDriverError::Io(e) => {
                assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
            }
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = FanDriverError::Config("temp_min must be below temp_max".to_string());
        assert_eq!(
            format!("{}", err),
            "Configuration error: temp_min must be below temp_max"
        );

        let err = FanDriverError::SensorUnavailable {
            path: PathBuf::from("/sys/class/thermal/thermal_zone0/temp"),
            reason: "not a number".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Sensor unavailable at /sys/class/thermal/thermal_zone0/temp: not a number"
        );

        let err = FanDriverError::PinSetup {
            pin: 21,
            reason: "busy".to_string(),
        };
        assert_eq!(format!("{}", err), "Failed to set up pin 21: busy");

        let err = FanDriverError::PinWrite {
            pin: 21,
            level: PinLevel::High,
            reason: "EIO".to_string(),
        };
        assert_eq!(format!("{}", err), "Failed to write high to pin 21: EIO");
    }
}
