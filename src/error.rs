use core::fmt;

use embedded_hal::digital::ErrorKind;

/// Which edge of the echo pulse a measurement was waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoEdge {
    Rising,
    Falling,
}

impl fmt::Display for EchoEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EchoEdge::Rising => write!(f, "rising"),
            EchoEdge::Falling => write!(f, "falling"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No echo edge within `echo_timeout_us`. Nothing is in range, or the
    /// target is too far or too soft to reflect the burst.
    #[error("Out of range: no {0} echo edge within the timeout")]
    Timeout(EchoEdge),

    /// Air temperature outside the sensor's -15..=70 °C operating band.
    #[error("air temperature {0} °C is outside the -15..=70 °C operating range")]
    InvalidTemperature(f64),

    #[error("echo timeout must be greater than zero")]
    InvalidTimeout,

    /// The echo line was still high from a previous cycle and never settled.
    #[error("echo line stuck high before triggering")]
    EchoStuckHigh,

    #[error("gpio error: {0}")]
    Gpio(ErrorKind),

    #[error("failed to request gpio line: {0}")]
    Init(#[from] gpio_cdev::errors::Error),
}

pub type Result<T> = core::result::Result<T, Error>;

/// Collapse a pin's own error type into an [`ErrorKind`].
pub(crate) fn gpio<E: embedded_hal::digital::Error>(err: E) -> Error {
    Error::Gpio(err.kind())
}
