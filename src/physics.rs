//! Speed of sound model and unit conversions.
//!
//! The linear approximation `331.3 + 0.606 * T` holds across the sensor's
//! rated operating band of -15..=70 °C, which is why temperatures outside
//! that band are rejected rather than clamped.

use crate::error::{Error, Result};

pub const MIN_AIR_TEMP_C: f64 = -15.0;
pub const MAX_AIR_TEMP_C: f64 = 70.0;
pub const NOMINAL_AIR_TEMP_C: f64 = 20.0;

/// Rated maximum range of the HC-SR04.
pub const MAX_RANGE_MM: u32 = 4_000;

/// Speed of sound at [`NOMINAL_AIR_TEMP_C`], in mm/s (331.3 + 0.606 * 20 m/s).
const NOMINAL_SPEED_MM_S: u64 = 331_300 + 606 * 20;

const METERS_TO_INCHES: f64 = 39.3701;

/// Default echo timeout: the 4 m round trip at 20 °C plus a quarter on top.
pub const DEFAULT_ECHO_TIMEOUT_US: u32 = with_margin(round_trip_us(MAX_RANGE_MM));

/// Round-trip time of flight for a target `range_mm` away at 20 °C, rounded up.
pub const fn round_trip_us(range_mm: u32) -> u32 {
    let travel_um = 2 * range_mm as u64 * 1_000_000;
    travel_um.div_ceil(NOMINAL_SPEED_MM_S) as u32
}

/// Pads a time of flight by 25% so an echo right at the rated range still fits.
pub const fn with_margin(tof_us: u32) -> u32 {
    tof_us + tof_us / 4
}

/// Speed of sound in air at `air_temp_c`, in m/s.
pub fn speed_of_sound(air_temp_c: f64) -> f64 {
    331.3 + 0.606 * air_temp_c
}

/// One-way distance in metres covered by an echo pulse of `pulse_us`.
pub fn pulse_to_meters(pulse_us: u32, air_temp_c: f64) -> f64 {
    f64::from(pulse_us) * speed_of_sound(air_temp_c) / 2_000_000.0
}

pub fn meters_to_cm(meters: f64) -> f64 {
    meters * 100.0
}

/// Nearest whole millimetre, ties away from zero.
pub fn meters_to_mm(meters: f64) -> u32 {
    (meters * 1_000.0).round() as u32
}

pub fn meters_to_inches(meters: f64) -> f64 {
    meters * METERS_TO_INCHES
}

/// Accepts `temp_c` only inside the operating band. NaN is rejected too.
pub fn check_air_temp(temp_c: f64) -> Result<f64> {
    if (MIN_AIR_TEMP_C..=MAX_AIR_TEMP_C).contains(&temp_c) {
        Ok(temp_c)
    } else {
        Err(Error::InvalidTemperature(temp_c))
    }
}
