//! Linux backend: GPIO character device lines and a `CLOCK_MONOTONIC` timebase.

use std::path::Path;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin, OutputPin};
use gpio_cdev::{Chip, LineHandle, LineRequestFlags};
use log::debug;

use crate::clock::MicrosClock;
use crate::config::SensorConfig;
use crate::error::Result;
use crate::sensor::RangeSensor;

/// The 40-pin header on the Raspberry Pi 5.
pub const DEFAULT_CHIP_PATH: &str = "/dev/gpiochip4";

const TRIGGER_CONSUMER: &str = "hc-sr04-trigger";
const ECHO_CONSUMER: &str = "hc-sr04-echo";

#[derive(Debug)]
pub struct CdevPinError(pub gpio_cdev::errors::Error);

impl digital::Error for CdevPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Requested output line.
pub struct CdevOutput(LineHandle);

impl ErrorType for CdevOutput {
    type Error = CdevPinError;
}

impl OutputPin for CdevOutput {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        self.0.set_value(0).map_err(CdevPinError)
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        self.0.set_value(1).map_err(CdevPinError)
    }
}

/// Requested input line, sampled by polling.
pub struct CdevInput(LineHandle);

impl ErrorType for CdevInput {
    type Error = CdevPinError;
}

impl InputPin for CdevInput {
    fn is_high(&mut self) -> core::result::Result<bool, Self::Error> {
        Ok(self.0.get_value().map_err(CdevPinError)? != 0)
    }

    fn is_low(&mut self) -> core::result::Result<bool, Self::Error> {
        Ok(!self.is_high()?)
    }
}

/// `CLOCK_MONOTONIC`, with delays done as busy-waits. `thread::sleep` is far
/// too coarse for a 10 us trigger pulse.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl MonotonicClock {
    fn now_ns(&self) -> u64 {
        let mut ts = libc::timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };
        // CLOCK_MONOTONIC is always available on Linux, so this cannot fail.
        unsafe {
            libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts);
        }
        ts.tv_sec as u64 * 1_000_000_000 + ts.tv_nsec as u64
    }
}

impl MicrosClock for MonotonicClock {
    fn now_us(&mut self) -> u64 {
        self.now_ns() / 1_000
    }
}

impl DelayNs for MonotonicClock {
    fn delay_ns(&mut self, ns: u32) {
        let start = self.now_ns();
        while self.now_ns() - start < u64::from(ns) {
            core::hint::spin_loop();
        }
    }
}

/// A sensor wired straight to a GPIO character device.
pub type CdevRangeSensor = RangeSensor<CdevOutput, CdevInput, MonotonicClock>;

impl RangeSensor<CdevOutput, CdevInput, MonotonicClock> {
    /// Request `trigger` (as an output, initially low) and `echo` (as an
    /// input) by line offset on `chip_path` and build a sensor on them.
    pub fn open(
        chip_path: impl AsRef<Path>,
        trigger: u32,
        echo: u32,
        config: SensorConfig,
    ) -> Result<Self> {
        let mut chip = Chip::new(chip_path.as_ref())?;

        let trigger_handle = chip
            .get_line(trigger)?
            .request(LineRequestFlags::OUTPUT, 0, TRIGGER_CONSUMER)?;
        let echo_handle = chip
            .get_line(echo)?
            .request(LineRequestFlags::INPUT, 0, ECHO_CONSUMER)?;

        debug!(
            "requested trigger line {} and echo line {} on {}",
            trigger,
            echo,
            chip_path.as_ref().display()
        );

        RangeSensor::new(
            CdevOutput(trigger_handle),
            CdevInput(echo_handle),
            MonotonicClock,
            config,
        )
    }
}
