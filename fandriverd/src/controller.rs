//! Fan control loop
//!
//! [`FanDriver`] owns everything the loop mutates: the active configuration,
//! the fan's [`PinState`], the sensor, and the claimed pin. Its lifecycle:
//!
//! ```text
//!   STARTING ──start()──▶ RUNNING ──stop request / fatal error──▶ STOPPING
//!                          │   ▲
//!                          └───┘ read → hysteresis → actuate → wait → reload?
//! ```
//!
//! Reloads only happen between iterations. A rejected reload keeps the
//! current configuration and never touches the pin. Every fatal error ends
//! the loop, and the pin is released exactly once on the way out.

use crate::config::{debug_config, load_config};
use crate::signals::ControlSignals;
use fandriver_core::{FanConfig, PinState, Result, Thresholds};
use fandriver_hardware::{PinActuator, PinGuard, TemperatureSource};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Hysteresis fan controller bound to one sensor and one output pin
pub struct FanDriver<S: TemperatureSource, A: PinActuator> {
    config_path: PathBuf,
    config: FanConfig,
    thresholds: Thresholds,
    sensor: S,
    pin: PinGuard<A>,
    state: PinState,
    signals: Arc<ControlSignals>,
}

impl<S: TemperatureSource, A: PinActuator> FanDriver<S, A> {
    /// Claim the control pin in the disengaged state.
    ///
    /// `config_path` is re-read on every reload request.
    pub fn start(
        config_path: PathBuf,
        config: FanConfig,
        sensor: S,
        actuator: A,
        signals: Arc<ControlSignals>,
    ) -> Result<Self> {
        let thresholds = config.thresholds()?;
        let state = PinState::default();

        let pin = PinGuard::acquire(actuator, config.control_pin, state.level()).map_err(|e| {
            error!("Pin setup failed: {}", e);
            e
        })?;
        info!("Fan driver initialized on pin #{}", config.control_pin);

        Ok(Self {
            config_path,
            config,
            thresholds,
            sensor,
            pin,
            state,
            signals,
        })
    }

    /// Run until a stop request or a fatal error, then release the pin.
    ///
    /// Returns `Ok(())` for a requested stop and the fatal error otherwise.
    pub async fn run(mut self) -> Result<()> {
        info!(
            "Starting fan driver: pin #{}, on above {}°C, off below {}°C, every {:?}",
            self.config.control_pin,
            self.thresholds.temp_max(),
            self.thresholds.temp_min(),
            self.config.poll_interval()
        );

        let result = self.control_loop().await;
        if let Err(ref e) = result {
            error!("Fan driver stopping on unexpected error: {}", e);
        }

        let Self { pin, .. } = self;
        let pin_id = pin.pin();
        match pin.release() {
            Ok(true) => info!("Released pin #{}, fan driver shutting down", pin_id),
            Ok(false) => info!("Fan driver shutting down"),
            Err(e) => warn!("{}, fan driver shutting down", e),
        }

        result
    }

    async fn control_loop(&mut self) -> Result<()> {
        loop {
            if self.signals.stop_requested() {
                info!("Stop requested");
                return Ok(());
            }

            self.iterate().await?;

            self.signals.wait(self.config.poll_interval()).await;

            if self.signals.take_reload() {
                self.reload().await?;
            }
        }
    }

    /// One control step: read, decide, and switch the fan if needed.
    ///
    /// The stored state only changes after the pin write succeeded.
    pub(crate) async fn iterate(&mut self) -> Result<()> {
        let temp = self.sensor.read().await.map_err(|e| {
            error!("Temperature read failed: {}", e);
            e
        })?;
        debug!("Temp: {:.1}°C", temp);

        let next = self.thresholds.next_state(self.state, temp);
        if next == self.state {
            return Ok(());
        }

        if let Err(e) = self.pin.write(next.level()) {
            error!(
                "Failed to switch fan {} at {:.1}°C: {}",
                next.as_str(),
                temp,
                e
            );
            return Err(e);
        }

        self.state = next;
        info!(
            "Changed pin #{} to {} at {:.1}°C",
            self.pin.pin(),
            next,
            temp
        );
        Ok(())
    }

    /// Re-read the configuration file and re-claim the pin.
    ///
    /// An invalid or unreadable file is logged and ignored. A failure to
    /// claim the pin under the new configuration is fatal.
    pub(crate) async fn reload(&mut self) -> Result<()> {
        info!("Reload requested, reading {}", self.config_path.display());

        let proposed = match load_config(&self.config_path).await {
            Ok(config) => config,
            Err(e) => {
                error!("Rejected configuration reload, keeping current settings: {}", e);
                return Ok(());
            }
        };
        let thresholds = match proposed.thresholds() {
            Ok(thresholds) => thresholds,
            Err(e) => {
                error!("Rejected configuration reload, keeping current settings: {}", e);
                return Ok(());
            }
        };

        let restart_only = self.config.restart_required_changes(&proposed);
        if !restart_only.is_empty() {
            warn!(
                "Changes to {} take effect after a restart",
                restart_only.join(", ")
            );
        }

        self.config = proposed;
        self.thresholds = thresholds;

        let level = self.state.level();
        self.pin
            .reacquire(self.config.control_pin, level)
            .map_err(|e| {
                error!("Pin setup failed after reload: {}", e);
                e
            })?;

        info!(
            "Reloaded config, pin #{} re-initialized {}",
            self.config.control_pin, self.state
        );
        debug_config(&self.config);
        Ok(())
    }
}
