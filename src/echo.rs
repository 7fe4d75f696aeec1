//! Echo pulse capture.
//!
//! The sensor answers a trigger pulse with an echo pulse whose width is the
//! sound's round trip time. The capture unit latches the echo timer on the
//! rising edge, then on the falling edge, and the difference gives the
//! distance.

use crate::config::MICROS_PER_CM;
use crate::peripheral::{CaptureUnit, Edge};

/// Last measured distance in centimeters, or [`Distance::NO_ECHO`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Distance(u16);

impl Distance {
    /// No echo came back inside the measurable range.
    pub const NO_ECHO: Distance = Distance(0xFFFF);

    /// Distance from two captures of the echo timer.
    ///
    /// A wrapped timer (`fall < rise`) is reported like an overflow, since
    /// the unsigned difference would otherwise show up as a large false
    /// distance.
    pub fn from_echo(rise: u16, fall: u16, overflowed: bool) -> Self {
        if overflowed {
            return Self::NO_ECHO;
        }
        match fall.checked_sub(rise) {
            Some(width) => Distance(width / MICROS_PER_CM),
            None => Self::NO_ECHO,
        }
    }

    /// Centimeters, `None` for [`Distance::NO_ECHO`].
    pub fn centimeters(self) -> Option<u16> {
        if self == Self::NO_ECHO {
            None
        } else {
            Some(self.0)
        }
    }

    pub fn raw(self) -> u16 {
        self.0
    }
}

impl Default for Distance {
    fn default() -> Self {
        Self::NO_ECHO
    }
}

/// Which edge the capture unit is waiting for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CaptureState {
    ArmedRising,
    ArmedFalling,
}

/// Capture interrupt state: the armed edge and the rising-edge sample.
pub struct EchoCapture {
    state: CaptureState,
    sample: u16,
}

impl EchoCapture {
    pub const fn new() -> Self {
        Self {
            state: CaptureState::ArmedRising,
            sample: 0,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn sample(&self) -> u16 {
        self.sample
    }

    /// Handle one capture interrupt.
    ///
    /// After a falling edge the new distance is handed to `publish` and also
    /// returned; a rising edge only records the sample. Runs in constant time
    /// and acknowledges the interrupt last.
    pub fn on_capture_edge<U, F>(&mut self, unit: &mut U, publish: F) -> Option<Distance>
    where
        U: CaptureUnit,
        F: FnOnce(Distance),
    {
        let captured = unit.read_capture();

        let distance = match self.state {
            CaptureState::ArmedRising => {
                self.sample = captured;
                unit.clear_timer_overflow();
                unit.configure_capture(Edge::Falling);
                self.state = CaptureState::ArmedFalling;
                None
            }
            CaptureState::ArmedFalling => {
                let overflowed = unit.timer_overflowed();
                let distance = Distance::from_echo(self.sample, captured, overflowed);
                publish(distance);
                unit.configure_capture(Edge::Rising);
                self.state = CaptureState::ArmedRising;
                Some(distance)
            }
        };

        unit.clear_capture_interrupt();
        distance
    }
}

impl Default for EchoCapture {
    fn default() -> Self {
        Self::new()
    }
}
