//! Default locations of the daemon's external resources

use std::path::PathBuf;

/// Configuration file read when no path is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/fandriver/config.toml";

/// Thermal zone exposing the SoC temperature in millidegrees Celsius.
pub const DEFAULT_SENSOR_PATH: &str = "/sys/class/thermal/thermal_zone0/temp";

/// Returns the default path for the configuration file.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_PATH)
}

/// Returns the default temperature sensor file.
pub fn default_sensor_path() -> PathBuf {
    PathBuf::from(DEFAULT_SENSOR_PATH)
}
