//! Driver configuration snapshot
//!
//! Every field has a built-in default, so a configuration file only needs to
//! list the values it overrides. A loaded snapshot is never mutated; a reload
//! builds a new one and replaces the old one wholesale.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::logging::{LogFormat, LogLevel};
use super::paths::default_sensor_path;
use crate::error::{FanDriverError, Result};
use crate::hysteresis::Thresholds;
use crate::types::Celsius;

/// Default temperature above which the fan is switched on
pub const DEFAULT_TEMP_MAX: Celsius = 55.0;
/// Default temperature below which the fan is switched off
pub const DEFAULT_TEMP_MIN: Celsius = 45.0;
/// Default delay between two readings, in seconds
pub const DEFAULT_SLEEP_SECS: f64 = 1.0;
/// Default BCM number of the pin driving the fan transistor
pub const DEFAULT_CONTROL_PIN: u32 = 21;

/// Serialization format of a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from the file extension: `.json` is JSON, anything else TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

/// Configuration of the fan driver.
///
/// Located at `/etc/fandriver/config.toml` by default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FanConfig {
    /// Minimum severity of log events
    pub log_level: LogLevel,

    /// Append logs to this file instead of stderr
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// Layout of log lines
    pub log_format: LogFormat,

    /// Temperature (°C) above which the fan is engaged
    pub temp_max: Celsius,

    /// Temperature (°C) below which the fan is disengaged
    pub temp_min: Celsius,

    /// Seconds between two temperature readings
    pub sleep: f64,

    /// BCM number of the output pin switching the fan
    pub control_pin: u32,

    /// File holding the temperature in millidegrees Celsius
    pub sensor_path: PathBuf,
}

impl Default for FanConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            log_file: None,
            log_format: LogFormat::default(),
            temp_max: DEFAULT_TEMP_MAX,
            temp_min: DEFAULT_TEMP_MIN,
            sleep: DEFAULT_SLEEP_SECS,
            control_pin: DEFAULT_CONTROL_PIN,
            sensor_path: default_sensor_path(),
        }
    }
}

impl FanConfig {
    /// Parse FanConfig from TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse FanConfig from JSON string.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse and validate file content in the given format.
    ///
    /// Any failure is reported as [`FanDriverError::Config`].
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        let config = match format {
            ConfigFormat::Toml => Self::from_toml(content),
            ConfigFormat::Json => Self::from_json(content),
        }
        .map_err(|e| FanDriverError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the control loop relies on.
    pub fn validate(&self) -> Result<()> {
        Thresholds::new(self.temp_min, self.temp_max)?;

        if !self.sleep.is_finite() || self.sleep <= 0.0 {
            return Err(FanDriverError::Config(format!(
                "sleep must be a positive number of seconds, got {}",
                self.sleep
            )));
        }
        Duration::try_from_secs_f64(self.sleep).map_err(|e| {
            FanDriverError::Config(format!("sleep {} is out of range: {}", self.sleep, e))
        })?;

        if self.sensor_path.as_os_str().is_empty() {
            return Err(FanDriverError::Config(
                "sensor_path must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Switching thresholds of this snapshot.
    pub fn thresholds(&self) -> Result<Thresholds> {
        Thresholds::new(self.temp_min, self.temp_max)
    }

    /// Delay between two iterations of the control loop.
    ///
    /// Falls back to the default interval for a snapshot that would not pass
    /// [`FanConfig::validate`].
    pub fn poll_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.sleep)
            .ok()
            .filter(|d| !d.is_zero())
            .unwrap_or(Duration::from_secs_f64(DEFAULT_SLEEP_SECS))
    }

    /// Fields that differ from `other` but only take effect at startup.
    pub fn restart_required_changes(&self, other: &FanConfig) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.log_level != other.log_level {
            changed.push("log_level");
        }
        if self.log_file != other.log_file {
            changed.push("log_file");
        }
        if self.log_format != other.log_format {
            changed.push("log_format");
        }
        if self.sensor_path != other.sensor_path {
            changed.push("sensor_path");
        }
        changed
    }
}
