use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::{debug, info, warn};

use crate::clock::MicrosClock;
use crate::config::SensorConfig;
use crate::error::{EchoEdge, Error, Result, gpio};
use crate::physics;

/// Low time before the trigger pulse so the sensor sees a clean rising edge.
const TRIGGER_SETTLE_US: u32 = 5;
/// Trigger pulse width required by the datasheet to start a ranging cycle.
const TRIGGER_PULSE_US: u32 = 10;

/// An HC-SR04 style sensor on a trigger/echo pin pair.
///
/// Every `distance_*` call fires its own ranging cycle and blocks until the
/// echo pulse ends or `echo_timeout_us` runs out, waiting at most that long
/// for each edge. The readings are not cached or filtered.
///
/// All measuring methods take `&mut self`. To share one sensor between
/// threads, put it behind a `Mutex`; two sensors must never share pins.
pub struct RangeSensor<T, E, C> {
    trigger: T,
    echo: E,
    clock: C,
    echo_timeout_us: u32,
    air_temp_celsius: f64,
}

impl<T, E, C> RangeSensor<T, E, C>
where
    T: OutputPin,
    E: InputPin,
    C: MicrosClock + DelayNs,
{
    /// Takes ownership of the lines and drives the trigger low.
    ///
    /// `echo` must already be configured as an input. Fails without touching
    /// the pins if the configuration is invalid.
    pub fn new(mut trigger: T, echo: E, clock: C, config: SensorConfig) -> Result<Self> {
        if config.echo_timeout_us == 0 {
            return Err(Error::InvalidTimeout);
        }
        let air_temp_celsius = physics::check_air_temp(config.air_temp_celsius)?;

        trigger.set_low().map_err(gpio)?;

        debug!(
            "hc-sr04 ready: echo timeout {} us, air temp {} °C",
            config.echo_timeout_us, air_temp_celsius
        );

        Ok(Self {
            trigger,
            echo,
            clock,
            echo_timeout_us: config.echo_timeout_us,
            air_temp_celsius,
        })
    }

    pub fn with_defaults(trigger: T, echo: E, clock: C) -> Result<Self> {
        Self::new(trigger, echo, clock, SensorConfig::default())
    }

    /// Replace the air temperature used for speed of sound compensation.
    /// Out of band values are rejected and the previous temperature is kept.
    pub fn update_air_temp(&mut self, new_temp_celsius: f64) -> Result<()> {
        match physics::check_air_temp(new_temp_celsius) {
            Ok(temp) => {
                info!("air temperature {} -> {} °C", self.air_temp_celsius, temp);
                self.air_temp_celsius = temp;
                Ok(())
            }
            Err(e) => {
                warn!("rejected air temperature {} °C", new_temp_celsius);
                Err(e)
            }
        }
    }

    pub fn air_temp_celsius(&self) -> f64 {
        self.air_temp_celsius
    }

    pub fn echo_timeout_us(&self) -> u32 {
        self.echo_timeout_us
    }

    /// Speed of sound at the current air temperature, in m/s.
    pub fn speed_of_sound(&self) -> f64 {
        physics::speed_of_sound(self.air_temp_celsius)
    }

    /// Returns distance in cm.
    pub fn distance_cm(&mut self) -> Result<f64> {
        Ok(physics::meters_to_cm(self.distance_m()?))
    }

    /// Returns distance in whole mm, rounded to nearest.
    pub fn distance_mm(&mut self) -> Result<u32> {
        Ok(physics::meters_to_mm(self.distance_m()?))
    }

    /// Returns distance in inches.
    pub fn distance_in(&mut self) -> Result<f64> {
        Ok(physics::meters_to_inches(self.distance_m()?))
    }

    /// Returns distance in m.
    pub fn distance_m(&mut self) -> Result<f64> {
        let pulse_us = self.measure_pulse_duration_us()?;
        Ok(physics::pulse_to_meters(pulse_us, self.air_temp_celsius))
    }

    /// Give the lines and clock back.
    pub fn release(self) -> (T, E, C) {
        (self.trigger, self.echo, self.clock)
    }

    fn measure_pulse_duration_us(&mut self) -> Result<u32> {
        // A previous cycle that timed out on the falling edge can leave the
        // echo line high for a while.
        if self.echo.is_high().map_err(gpio)? {
            let since = self.clock.now_us();
            if self.wait_for_echo(false, since)?.is_none() {
                warn!("echo line did not settle low within {} us", self.echo_timeout_us);
                return Err(Error::EchoStuckHigh);
            }
        }

        self.send_trigger_pulse()?;

        let armed = self.clock.now_us();
        let Some(rise) = self.wait_for_echo(true, armed)? else {
            warn!("no echo within {} us", self.echo_timeout_us);
            return Err(Error::Timeout(EchoEdge::Rising));
        };

        let Some(fall) = self.wait_for_echo(false, rise)? else {
            warn!("echo still high after {} us", self.echo_timeout_us);
            return Err(Error::Timeout(EchoEdge::Falling));
        };

        let pulse_us = u32::try_from(fall - rise).unwrap_or(u32::MAX);
        debug!("echo pulse {} us", pulse_us);
        Ok(pulse_us)
    }

    fn send_trigger_pulse(&mut self) -> Result<()> {
        self.trigger.set_low().map_err(gpio)?;
        self.clock.delay_us(TRIGGER_SETTLE_US);
        self.trigger.set_high().map_err(gpio)?;
        self.clock.delay_us(TRIGGER_PULSE_US);
        self.trigger.set_low().map_err(gpio)
    }

    /// Spin until echo reads `high`, returning the timestamp it was seen at,
    /// or `None` once `echo_timeout_us` has passed since `start_us`.
    fn wait_for_echo(&mut self, high: bool, start_us: u64) -> Result<Option<u64>> {
        let timeout = u64::from(self.echo_timeout_us);
        loop {
            let level = self.echo.is_high().map_err(gpio)?;
            let now = self.clock.now_us();
            if level == high {
                return Ok(Some(now));
            }
            if now.saturating_sub(start_us) >= timeout {
                return Ok(None);
            }
            core::hint::spin_loop();
        }
    }
}
