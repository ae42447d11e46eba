//! fandriver daemon
//!
//! Keeps a GPIO-switched cooling fan in sync with a temperature sensor, using
//! a hysteresis band so the fan does not chatter around a single threshold.
//!
//! # Signals
//!
//! - `SIGTERM` / `SIGINT`: release the pin and exit
//! - `SIGHUP`: re-read the configuration file and re-initialize the pin
//!
//! # Configuration
//!
//! The configuration path is taken from the command line, then from the
//! `FANDRIVER_CONFIG` environment variable, then defaults to
//! `/etc/fandriver/config.toml`.

mod config;
mod controller;
mod logging;
mod signals;

use anyhow::Result;
use clap::Parser;
use controller::FanDriver;
use fandriver_core::{default_config_path, FanConfig};
use fandriver_hardware::{
    MockGpio, PinActuator, RppalGpio, SimulatedSensor, TemperatureSource, ThermalZoneSensor,
};
use signals::ControlSignals;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// fandriver daemon
#[derive(Parser, Debug)]
#[command(name = "fandriverd")]
#[command(version, about = "Hysteresis fan control daemon", long_about = None)]
struct Args {
    /// Path to configuration file (TOML, or JSON when ending in .json)
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable mock mode (simulated sensor and GPIO, no hardware access)
    #[arg(long)]
    mock: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Determine config path: CLI argument > env var > default
    let config_path = args.config.unwrap_or_else(|| {
        std::env::var("FANDRIVER_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_config_path())
    });

    let config = match config::load_config(&config_path).await {
        Ok(config) => config,
        Err(e) => {
            logging::init_tracing(&FanConfig::default(), args.verbose)?;
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    logging::init_tracing(&config, args.verbose)?;
    info!("Loaded config from {}", config_path.display());
    config::debug_config(&config);

    let signals = Arc::new(ControlSignals::new());
    signals::spawn_listener(signals.clone())?;

    if args.mock {
        info!("Mock mode - using simulated sensor and GPIO");
        run_driver(
            config_path,
            config,
            SimulatedSensor::default(),
            MockGpio::new(),
            signals,
        )
        .await
    } else {
        let sensor = ThermalZoneSensor::new(&config.sensor_path);
        info!("Reading temperature from {}", sensor.path().display());
        run_driver(config_path, config, sensor, RppalGpio::new(), signals).await
    }
}

/// Claim the pin and drive the fan until stopped
async fn run_driver<S, A>(
    config_path: PathBuf,
    config: FanConfig,
    sensor: S,
    actuator: A,
    signals: Arc<ControlSignals>,
) -> Result<()>
where
    S: TemperatureSource,
    A: PinActuator,
{
    let driver = FanDriver::start(config_path, config, sensor, actuator, signals)?;
    driver.run().await?;

    info!("Fan driver shutdown complete");
    Ok(())
}
