//! The 100 ms tick.
//!
//! Each tick refreshes both display lines, advances the clock every tenth
//! tick and fires the next trigger pulse. It runs at the lower interrupt
//! priority, so the capture interrupt may preempt it anywhere; the only
//! state it shares with capture goes through [`TickPorts`].

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::digital::v2::OutputPin;

use crate::clock::{ClockTime, TickCounter};
use crate::config::TICK_RELOAD;
use crate::display::{format_clock, format_distance, DisplayLine, Row, TextSink};
use crate::peripheral::TickPorts;
use crate::trigger::TriggerPulse;

/// What happened during one tick, for the caller to log.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// The clock advanced by one second.
    pub second_elapsed: bool,
    /// The text sink rejected at least one line.
    pub sink_failed: bool,
}

pub struct TickScheduler {
    reload: u16,
    ticks: TickCounter,
    clock: ClockTime,
    lines: [DisplayLine; 2],
}

impl TickScheduler {
    pub const fn new() -> Self {
        Self::with_time(ClockTime::MIDNIGHT)
    }

    pub const fn with_time(clock: ClockTime) -> Self {
        Self {
            reload: TICK_RELOAD,
            ticks: TickCounter::new(),
            clock,
            lines: [DisplayLine::BLANK; 2],
        }
    }

    pub fn reload(&self) -> u16 {
        self.reload
    }

    pub fn clock(&self) -> ClockTime {
        self.clock
    }

    pub fn ticks(&self) -> u8 {
        self.ticks.value()
    }

    pub fn line(&self, row: Row) -> &DisplayLine {
        &self.lines[row.index()]
    }

    /// Runs one tick.
    ///
    /// The timer is reloaded first so drift stays within one tick, and the
    /// interrupt is acknowledged last even when the trigger pin fails.
    pub fn on_tick<P, S, T, D>(
        &mut self,
        ports: &mut P,
        sink: &mut S,
        trigger: &mut TriggerPulse<T, D>,
    ) -> Result<TickReport, T::Error>
    where
        P: TickPorts,
        S: TextSink,
        T: OutputPin,
        D: DelayUs<u32>,
    {
        let mut report = TickReport::default();

        ports.reload_periodic(self.reload);

        let distance = ports.read_distance();
        self.lines[Row::Distance.index()] = format_distance(distance);
        report.sink_failed |= self.flush(sink, Row::Distance);

        if self.ticks.tick() {
            self.clock.tick();
            report.second_elapsed = true;
        }
        self.lines[Row::Clock.index()] = format_clock(self.clock);
        report.sink_failed |= self.flush(sink, Row::Clock);

        // the new echo is timed from zero
        ports.reset_echo_timer();
        let pulse = trigger.emit();

        ports.clear_tick_interrupt();
        pulse?;
        Ok(report)
    }

    /// Returns true if the sink failed.
    fn flush<S: TextSink>(&self, sink: &mut S, row: Row) -> bool {
        sink.write_line(row, self.line(row)).is_err()
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}
