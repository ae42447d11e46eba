//! fandriver-hardware
//!
//! Hardware abstraction crate that contains the temperature sensor and GPIO
//! adapters used by the fandriver daemon.
//!
//! Public API:
//! - `sensor::TemperatureSource`: reading abstraction, with `ThermalZoneSensor` for sysfs
//! - `gpio::PinActuator`: digital output abstraction, with `RppalGpio` for the Raspberry Pi header
//! - `guard::PinGuard`: pairs every pin initialization with exactly one release
//! - `mock`: recording and simulated stand-ins for tests and mock mode

pub mod gpio;
pub mod guard;
pub mod mock;
pub mod sensor;

pub use gpio::{PinActuator, RppalGpio};
pub use guard::PinGuard;
pub use mock::{MockGpio, MockSensor, PinCall, SimulatedSensor};
pub use sensor::{parse_millidegrees, TemperatureSource, ThermalZoneSensor};

