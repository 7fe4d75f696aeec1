//! Ultrasonic distance meter with a real-time clock.
//!
//! Hardware-independent core of the firmware: the echo capture state
//! machine, the 100 ms tick scheduler that drives the clock and re-triggers
//! the sensor, and the two 16-character display lines. The RTIC binary in
//! `main.rs` binds these to the RP2040 interrupts.

#![cfg_attr(not(test), no_std)]

pub mod clock;
pub mod config;
pub mod display;
pub mod echo;
pub mod peripheral;
pub mod scheduler;
pub mod trigger;

pub use clock::{ClockTime, TickCounter};
pub use display::{DisplayLine, NullSink, Row, TextSink};
pub use echo::{CaptureState, Distance, EchoCapture};
pub use peripheral::{CaptureUnit, Edge, TickPorts};
pub use scheduler::{TickReport, TickScheduler};
pub use trigger::TriggerPulse;
