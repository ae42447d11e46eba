//! Configuration types for fandriver
//!
//! # Architecture
//!
//! Configuration is a single flat record:
//! - [`FanConfig`] - thresholds, poll interval, pin, sensor, and logging settings
//! - [`LogLevel`] / [`LogFormat`] - logging settings, applied by the daemon at startup
//!
//! Files are TOML by default, or JSON when the path ends in `.json`.

mod driver_config;
mod logging;
mod paths;

pub use driver_config::{
    ConfigFormat, FanConfig, DEFAULT_CONTROL_PIN, DEFAULT_SLEEP_SECS, DEFAULT_TEMP_MAX,
    DEFAULT_TEMP_MIN,
};
pub use logging::{LogFormat, LogLevel};
pub use paths::{
    default_config_path, default_sensor_path, DEFAULT_CONFIG_PATH, DEFAULT_SENSOR_PATH,
};
