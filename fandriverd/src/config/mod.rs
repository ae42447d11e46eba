//! Configuration loading
//!
//! Reads the configuration file, merges it over the built-in defaults, and
//! validates the result. Used both at startup and on reload.

use fandriver_core::{ConfigFormat, FanConfig, FanDriverError, Result};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Load and validate the configuration file at `path`.
///
/// Every failure, including a missing file, is a [`FanDriverError::Config`].
pub async fn load_config(path: &Path) -> Result<FanConfig> {
    debug!("Loading configuration from: {}", path.display());

    let content = fs::read_to_string(path).await.map_err(|e| {
        FanDriverError::Config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    FanConfig::parse(&content, ConfigFormat::from_path(path))
}

/// Print configuration to debug log
pub fn debug_config(config: &FanConfig) {
    debug!("--- Control ---");
    debug!("  Pin: {}", config.control_pin);
    debug!("  On above: {}°C", config.temp_max);
    debug!("  Off below: {}°C", config.temp_min);
    debug!("  Interval: {}s", config.sleep);
    debug!("  Sensor: {}", config.sensor_path.display());
    debug!("--- Logging ---");
    debug!("  Level: {}", config.log_level);
    debug!("  Format: {:?}", config.log_format);
    match &config.log_file {
        Some(path) => debug!("  File: {}", path.display()),
        None => debug!("  File: stderr"),
    }
    debug!("---------------");
}

#[cfg(test)]
mod tests {
    use super::*;
    use fandriver_core::LogLevel;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_toml_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "temp_max = 65\nsleep = 0.5\n").unwrap();

        let config = load_config(&path).await.unwrap();
        assert_eq!(config.temp_max, 65.0);
        assert_eq!(config.temp_min, 45.0);
        assert_eq!(config.sleep, 0.5);
        assert_eq!(config.control_pin, 21);
    }

    #[tokio::test]
    async fn test_load_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fan_driver.config.json");
        std::fs::write(
            &path,
            r#"{"log_level": "WARNING", "control_pin": 17, "temp_max": 60}"#,
        )
        .unwrap();

        let config = load_config(&path).await.unwrap();
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.control_pin, 17);
        assert_eq!(config.temp_max, 60.0);
    }

    #[tokio::test]
    async fn test_missing_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.toml");

        let result = load_config(&path).await;
        match result {
            Err(FanDriverError::Config(msg)) => assert!(msg.contains("missing.toml")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_thresholds_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "temp_min = 60\ntemp_max = 50\n").unwrap();

        assert!(matches!(
            load_config(&path).await,
            Err(FanDriverError::Config(_))
        ));
    }
}
