//! fandriver Core Library
//!
//! Shared types, the hysteresis rule, configuration, and errors for the
//! fandriver daemon and its hardware adapters.

pub mod config;
pub mod error;
pub mod hysteresis;
pub mod types;

// Re-export commonly used types
pub use config::{default_config_path, ConfigFormat, FanConfig, LogFormat, LogLevel};
pub use error::*;
pub use hysteresis::Thresholds;
pub use types::*;
