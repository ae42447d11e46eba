//! Temperature sources
//!
//! Reads the current temperature from a Linux thermal zone.

use async_trait::async_trait;
use fandriver_core::{Celsius, FanDriverError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::trace;

/// Trait for temperature source abstraction
///
/// This trait enables testing of the control loop without real hardware
/// by allowing mock implementations.
#[async_trait]
pub trait TemperatureSource: Send {
    /// Read the current temperature in degrees Celsius.
    ///
    /// Fails with [`FanDriverError::SensorUnavailable`] when no value can be
    /// obtained; implementations never substitute a guessed reading.
    async fn read(&mut self) -> Result<Celsius>;
}

/// Sensor backed by a sysfs thermal zone file holding millidegrees Celsius
#[derive(Debug, Clone)]
pub struct ThermalZoneSensor {
    path: PathBuf,
}

impl ThermalZoneSensor {
    /// Create a sensor reading from the given file
    ///
    /// # Arguments
    /// * `path` - Thermal zone file (e.g., "/sys/class/thermal/thermal_zone0/temp")
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the file this sensor reads from
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, reason: impl Into<String>) -> FanDriverError {
        FanDriverError::SensorUnavailable {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }
}

/// Convert thermal zone content (millidegrees Celsius) to degrees Celsius
///
/// - "48312\n" → 48.312
/// - "-1500" → -1.5
pub fn parse_millidegrees(content: &str) -> std::result::Result<Celsius, String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err("empty reading".to_string());
    }

    let millis = trimmed
        .parse::<f64>()
        .map_err(|e| format!("invalid reading '{}': {}", trimmed, e))?;

    let temp = (millis / 1000.0) as Celsius;
    if !temp.is_finite() {
        return Err(format!("invalid reading '{}'", trimmed));
    }

    Ok(temp)
}

#[async_trait]
impl TemperatureSource for ThermalZoneSensor {
    async fn read(&mut self) -> Result<Celsius> {
        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.unavailable(e.to_string()))?;

        let temp = parse_millidegrees(&content).map_err(|reason| self.unavailable(reason))?;
        trace!("Read {} from {}", temp, self.path.display());
        Ok(temp)
    }
}
