//! Deterministic test bench: a trigger line, an echo line and a clock that
//! all share one simulated timeline.
//!
//! Every `now_us` call advances time by 1 us, so the sensor's busy-wait
//! loops always make progress. The echo line is a pure function of time and
//! of the last trigger falling edge.

#![allow(dead_code)]

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin};
use hcsr04_ranging::MicrosClock;

#[derive(Debug, Clone, Copy)]
pub enum Echo {
    /// Nothing in range: the echo line never rises.
    Silent,
    /// Rises `delay_us` after the trigger falls and stays high `width_us`,
    /// or forever when `None`.
    Pulse { delay_us: u64, width_us: Option<u64> },
}

impl Echo {
    pub fn pulse(width_us: u64) -> Self {
        Echo::Pulse { delay_us: 450, width_us: Some(width_us) }
    }

    pub fn stuck_after_rise() -> Self {
        Echo::Pulse { delay_us: 450, width_us: None }
    }
}

#[derive(Debug)]
struct State {
    now_us: u64,
    trigger_high: bool,
    trigger_edges: Vec<(u64, bool)>,
    last_trigger_fall: Option<u64>,
    echo: Echo,
    /// Echo reads high until this time regardless of the trigger.
    stale_high_until: u64,
}

impl State {
    fn echo_high(&self) -> bool {
        if self.now_us < self.stale_high_until {
            return true;
        }
        match (self.echo, self.last_trigger_fall) {
            (Echo::Pulse { delay_us, width_us }, Some(fall)) => {
                let rise = fall + delay_us;
                self.now_us >= rise && width_us.is_none_or(|w| self.now_us < rise + w)
            }
            _ => false,
        }
    }
}

/// Handle for inspecting and steering the bench from a test.
#[derive(Clone)]
pub struct Bench(Rc<RefCell<State>>);

impl Bench {
    pub fn new(echo: Echo) -> Self {
        Bench(Rc::new(RefCell::new(State {
            now_us: 0,
            trigger_high: false,
            trigger_edges: Vec::new(),
            last_trigger_fall: None,
            echo,
            stale_high_until: 0,
        })))
    }

    /// Leave the echo line high from a previous cycle until `until_us`.
    pub fn with_stale_echo_until(self, until_us: u64) -> Self {
        self.0.borrow_mut().stale_high_until = until_us;
        self
    }

    /// Swap what the next ranging cycle will see. The previous cycle's echo
    /// is forgotten so it cannot replay under the new profile.
    pub fn set_echo(&self, echo: Echo) {
        let mut state = self.0.borrow_mut();
        state.echo = echo;
        state.last_trigger_fall = None;
    }

    pub fn now_us(&self) -> u64 {
        self.0.borrow().now_us
    }

    /// Every trigger level change as `(time_us, high)`.
    pub fn trigger_edges(&self) -> Vec<(u64, bool)> {
        self.0.borrow().trigger_edges.clone()
    }

    pub fn trigger(&self) -> SimTrigger {
        SimTrigger(self.0.clone())
    }

    pub fn echo(&self) -> SimEcho {
        SimEcho(self.0.clone())
    }

    pub fn clock(&self) -> SimClock {
        SimClock(self.0.clone())
    }
}

pub struct SimTrigger(Rc<RefCell<State>>);

impl ErrorType for SimTrigger {
    type Error = Infallible;
}

impl OutputPin for SimTrigger {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut state = self.0.borrow_mut();
        if state.trigger_high {
            let now = state.now_us;
            state.last_trigger_fall = Some(now);
            state.trigger_edges.push((now, false));
        }
        state.trigger_high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut state = self.0.borrow_mut();
        if !state.trigger_high {
            let now = state.now_us;
            state.trigger_edges.push((now, true));
        }
        state.trigger_high = true;
        Ok(())
    }
}

pub struct SimEcho(Rc<RefCell<State>>);

impl ErrorType for SimEcho {
    type Error = Infallible;
}

impl InputPin for SimEcho {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.borrow().echo_high())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0.borrow().echo_high())
    }
}

pub struct SimClock(Rc<RefCell<State>>);

impl MicrosClock for SimClock {
    fn now_us(&mut self) -> u64 {
        let mut state = self.0.borrow_mut();
        state.now_us += 1;
        state.now_us
    }
}

impl DelayNs for SimClock {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().now_us += u64::from(ns.div_ceil(1_000));
    }
}

/// An echo input whose every read fails.
pub struct BrokenEcho;

impl ErrorType for BrokenEcho {
    type Error = ErrorKind;
}

impl InputPin for BrokenEcho {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Err(ErrorKind::Other)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Err(ErrorKind::Other)
    }
}

/// Distance in cm expected for a `pulse_us` wide echo at `temp_c`.
pub fn expected_cm(pulse_us: u64, temp_c: f64) -> f64 {
    (331.3 + 0.606 * temp_c) * pulse_us as f64 / (2.0 * 1e6) * 100.0
}
