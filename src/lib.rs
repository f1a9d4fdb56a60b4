//! HC-SR04 ultrasonic ranging with air temperature compensation.
//!
//! A 10 us pulse on the trigger line starts a ranging cycle; the sensor then
//! holds the echo line high for as long as the sound burst took to reach the
//! target and come back. [`RangeSensor`] times that pulse against a bounded
//! timeout and turns it into a distance using the speed of sound at the
//! configured air temperature. The sensor is rated for 2 cm to 4 m and
//! -15 °C to 70 °C.
//!
//! The pins and delay are [`embedded-hal`] 1.0 traits, and timestamps come from
//! [`MicrosClock`], so the measurement runs against anything from a simulated
//! bench to real hardware. On Linux, [`cdev`] provides the GPIO character
//! device backend:
//!
//! ```no_run
//! use hcsr04_ranging::{CdevRangeSensor, SensorConfig, cdev::DEFAULT_CHIP_PATH};
//!
//! let mut sensor = CdevRangeSensor::open(DEFAULT_CHIP_PATH, 21, 20, SensorConfig::default())?;
//! sensor.update_air_temp(12.5)?;
//! println!("{:.1} cm", sensor.distance_cm()?);
//! # Ok::<(), hcsr04_ranging::Error>(())
//! ```
//!
//! Measurements block the caller. Each `distance_*` call is one ranging cycle;
//! a timed out reading is returned as [`Error::Timeout`] and never retried.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal

pub mod cdev;
mod clock;
mod config;
mod error;
pub mod physics;
mod sensor;

pub use cdev::CdevRangeSensor;
pub use clock::MicrosClock;
pub use config::SensorConfig;
pub use error::{EchoEdge, Error, Result};
pub use physics::DEFAULT_ECHO_TIMEOUT_US;
pub use sensor::RangeSensor;
