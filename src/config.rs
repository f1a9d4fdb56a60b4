use crate::physics::{DEFAULT_ECHO_TIMEOUT_US, NOMINAL_AIR_TEMP_C, round_trip_us, with_margin};

/// Construction parameters for a [`RangeSensor`](crate::RangeSensor).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorConfig {
    /// How long to wait for each echo edge, in microseconds. Fixed for the
    /// lifetime of the sensor.
    pub echo_timeout_us: u32,
    /// Initial air temperature in °C, must be within -15..=70.
    pub air_temp_celsius: f64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            echo_timeout_us: DEFAULT_ECHO_TIMEOUT_US,
            air_temp_celsius: NOMINAL_AIR_TEMP_C,
        }
    }
}

impl SensorConfig {
    pub const fn with_echo_timeout_us(mut self, echo_timeout_us: u32) -> Self {
        self.echo_timeout_us = echo_timeout_us;
        self
    }

    pub const fn with_air_temp_celsius(mut self, air_temp_celsius: f64) -> Self {
        self.air_temp_celsius = air_temp_celsius;
        self
    }

    /// Derive the echo timeout from a shorter usable range, e.g. when the
    /// sensor is mounted in a tank and nothing can be further than the bottom.
    /// Readings beyond `range_mm` then fail fast instead of blocking for the
    /// full 4 m window.
    pub const fn for_max_range_mm(range_mm: u32) -> Self {
        Self {
            echo_timeout_us: with_margin(round_trip_us(range_mm)),
            air_temp_celsius: NOMINAL_AIR_TEMP_C,
        }
    }
}
