//! Mock hardware
//!
//! Stand-ins for the sensor and GPIO used by the daemon's mock mode and by
//! tests. Clones share state, so a test can keep a handle while the control
//! loop owns another and inspect the full call history afterwards.

use crate::gpio::PinActuator;
use crate::sensor::TemperatureSource;
use async_trait::async_trait;
use fandriver_core::{Celsius, FanDriverError, PinLevel, Result};
use std::collections::{HashSet, VecDeque};
use std::f32::consts::TAU;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ── Sensor ─────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct MockSensorState {
    readings: VecDeque<std::result::Result<Celsius, String>>,
    fallback: Option<Celsius>,
    reads: usize,
}

/// Sensor returning scripted readings
///
/// Once the script is exhausted it returns the fallback value, or fails with
/// `SensorUnavailable` when none is set.
#[derive(Debug, Clone, Default)]
pub struct MockSensor {
    state: Arc<Mutex<MockSensorState>>,
}

impl MockSensor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reading
    pub fn push_reading(&self, temp: Celsius) {
        lock(&self.state).readings.push_back(Ok(temp));
    }

    /// Queue a failed reading
    pub fn push_failure(&self, reason: impl Into<String>) {
        lock(&self.state).readings.push_back(Err(reason.into()));
    }

    /// Value returned once the script is exhausted
    pub fn set_fallback(&self, temp: Option<Celsius>) {
        lock(&self.state).fallback = temp;
    }

    /// Number of read attempts so far
    pub fn reads(&self) -> usize {
        lock(&self.state).reads
    }
}

#[async_trait]
impl TemperatureSource for MockSensor {
    async fn read(&mut self) -> Result<Celsius> {
        let mut state = lock(&self.state);
        state.reads += 1;

        let next = match state.readings.pop_front() {
            Some(reading) => reading,
            None => state
                .fallback
                .ok_or_else(|| "no reading queued".to_string()),
        };

        next.map_err(|reason| FanDriverError::SensorUnavailable {
            path: PathBuf::from("mock"),
            reason,
        })
    }
}

/// Sensor following a slow sine wave, for running the daemon without hardware
///
/// The default wave swings between 42 °C and 58 °C over two minutes, crossing
/// the default thresholds in both directions.
#[derive(Debug, Clone)]
pub struct SimulatedSensor {
    started: Instant,
    center: Celsius,
    amplitude: Celsius,
    period: Duration,
}

impl Default for SimulatedSensor {
    fn default() -> Self {
        Self::new(50.0, 8.0, Duration::from_secs(120))
    }
}

impl SimulatedSensor {
    pub fn new(center: Celsius, amplitude: Celsius, period: Duration) -> Self {
        Self {
            started: Instant::now(),
            center,
            amplitude,
            period,
        }
    }

    /// Temperature of the wave `elapsed` after start
    pub fn temperature_at(&self, elapsed: Duration) -> Celsius {
        let period = self.period.as_secs_f32();
        if period <= 0.0 {
            return self.center;
        }
        let phase = (elapsed.as_secs_f32() / period) * TAU;
        self.center + self.amplitude * phase.sin()
    }
}

#[async_trait]
impl TemperatureSource for SimulatedSensor {
    async fn read(&mut self) -> Result<Celsius> {
        Ok(self.temperature_at(self.started.elapsed()))
    }
}

// ── GPIO ───────────────────────────────────────────────────────

/// One recorded actuator call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinCall {
    Initialize { pin: u32, level: PinLevel },
    Write { pin: u32, level: PinLevel },
    Release { pin: u32 },
}

#[derive(Debug, Default)]
struct MockGpioState {
    calls: Vec<PinCall>,
    claimed: HashSet<u32>,
    failing_setup: HashSet<u32>,
    fail_writes: bool,
    fail_release: bool,
}

/// GPIO recording every call instead of touching hardware
///
/// Successful initializations, successful writes, and every release attempt
/// are recorded. Failures can be injected per operation.
#[derive(Debug, Clone, Default)]
pub struct MockGpio {
    state: Arc<Mutex<MockGpioState>>,
}

impl MockGpio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `initialize` of `pin` fail
    pub fn fail_setup_of(&self, pin: u32) {
        lock(&self.state).failing_setup.insert(pin);
    }

    /// Make `write` fail while `fail` is set
    pub fn fail_writes(&self, fail: bool) {
        lock(&self.state).fail_writes = fail;
    }

    /// Make `release` of a claimed pin fail while `fail` is set
    pub fn fail_release(&self, fail: bool) {
        lock(&self.state).fail_release = fail;
    }

    /// Full call history
    pub fn calls(&self) -> Vec<PinCall> {
        lock(&self.state).calls.clone()
    }

    /// Levels written so far, in order
    pub fn writes(&self) -> Vec<(u32, PinLevel)> {
        lock(&self.state)
            .calls
            .iter()
            .filter_map(|call| match *call {
                PinCall::Write { pin, level } => Some((pin, level)),
                _ => None,
            })
            .collect()
    }

    pub fn initialize_count(&self, pin: u32) -> usize {
        self.count(|call| matches!(call, PinCall::Initialize { pin: p, .. } if *p == pin))
    }

    pub fn release_count(&self, pin: u32) -> usize {
        self.count(|call| matches!(call, PinCall::Release { pin: p } if *p == pin))
    }

    /// Whether `pin` is initialized and not yet released
    pub fn is_claimed(&self, pin: u32) -> bool {
        lock(&self.state).claimed.contains(&pin)
    }

    fn count(&self, predicate: impl Fn(&PinCall) -> bool) -> usize {
        lock(&self.state).calls.iter().filter(|c| predicate(c)).count()
    }
}

impl PinActuator for MockGpio {
    fn initialize(&mut self, pin: u32, level: PinLevel) -> Result<()> {
        let mut state = lock(&self.state);
        if state.failing_setup.contains(&pin) {
            return Err(FanDriverError::PinSetup {
                pin,
                reason: "injected setup failure".to_string(),
            });
        }
        state.claimed.insert(pin);
        state.calls.push(PinCall::Initialize { pin, level });
        Ok(())
    }

    fn write(&mut self, pin: u32, level: PinLevel) -> Result<()> {
        let mut state = lock(&self.state);
        if state.fail_writes || !state.claimed.contains(&pin) {
            return Err(FanDriverError::PinWrite {
                pin,
                level,
                reason: "injected write failure".to_string(),
            });
        }
        state.calls.push(PinCall::Write { pin, level });
        Ok(())
    }

    fn release(&mut self, pin: u32) -> Result<()> {
        let mut state = lock(&self.state);
        state.calls.push(PinCall::Release { pin });
        if !state.claimed.remove(&pin) {
            return Ok(());
        }
        if state.fail_release {
            return Err(FanDriverError::PinRelease {
                pin,
                reason: "injected release failure".to_string(),
            });
        }
        Ok(())
    }
}
