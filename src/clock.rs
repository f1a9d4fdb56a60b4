/// Monotonic microsecond time source used to bound the echo wait.
///
/// Paired with [`embedded_hal::delay::DelayNs`] for the trigger pulse. On
/// Linux see [`MonotonicClock`](crate::cdev::MonotonicClock).
pub trait MicrosClock {
    /// Microseconds since an arbitrary fixed origin. Must never go backwards.
    fn now_us(&mut self) -> u64;
}
