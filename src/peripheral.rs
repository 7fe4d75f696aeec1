//! Hardware seams consumed by the core.
//!
//! The firmware implements these over the RP2040 timer, GPIO and alarm
//! peripherals; tests implement them with recording mocks.

use crate::echo::Distance;

/// Edge of the echo pulse a capture is armed for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Rising,
    Falling,
}

/// Echo capture hardware as seen from the capture interrupt.
pub trait CaptureUnit {
    /// Arm the capture for the next `edge` on the echo input.
    fn configure_capture(&mut self, edge: Edge);

    /// Timer value latched by the last capture event.
    fn read_capture(&mut self) -> u16;

    /// Whether the echo timer overflowed since the flag was last cleared.
    fn timer_overflowed(&mut self) -> bool;

    fn clear_timer_overflow(&mut self);

    /// Acknowledge the capture interrupt.
    fn clear_capture_interrupt(&mut self);
}

/// Everything the tick interrupt touches besides the trigger pin and the
/// text sink.
pub trait TickPorts {
    /// Reload the periodic tick timer.
    fn reload_periodic(&mut self, value: u16);

    /// Snapshot the last measured distance.
    ///
    /// The capture interrupt may preempt the tick at any point, so the
    /// implementation must read the value inside a critical section that
    /// masks it.
    fn read_distance(&mut self) -> Distance;

    /// Zero the echo timer ahead of a new trigger pulse.
    fn reset_echo_timer(&mut self);

    /// Acknowledge the tick interrupt.
    fn clear_tick_interrupt(&mut self);
}
