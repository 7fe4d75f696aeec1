use crate::config::TICKS_PER_SECOND;

/// Time of day kept by the tick scheduler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockTime {
    pub hours: u8,
    pub mins: u8,
    pub secs: u8,
}

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime::new(0, 0, 0);

    /// Out-of-range fields are wrapped into their bounds.
    pub const fn new(hours: u8, mins: u8, secs: u8) -> Self {
        Self {
            hours: hours % 24,
            mins: mins % 60,
            secs: secs % 60,
        }
    }

    /// Increments the second. Handles rollover to minutes.
    pub fn tick(&mut self) {
        self.secs += 1;
        if self.secs >= 60 {
            self.secs = 0;
            self.add_minute();
        }
    }

    /// Increments the minute. Handles rollover to hours.
    pub fn add_minute(&mut self) {
        self.mins += 1;
        if self.mins >= 60 {
            self.mins = 0;
            self.add_hour();
        }
    }

    pub fn add_hour(&mut self) {
        self.hours += 1;
        if self.hours >= 24 {
            self.hours = 0;
        }
    }
}

/// Counts scheduler ticks within one second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickCounter(u8);

impl TickCounter {
    pub const fn new() -> Self {
        Self(0)
    }

    /// Counts one tick. Returns true when a full second has elapsed.
    pub fn tick(&mut self) -> bool {
        self.0 += 1;
        if self.0 >= TICKS_PER_SECOND {
            self.0 = 0;
            true
        } else {
            false
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_roll_into_minutes() {
        let mut t = ClockTime::new(0, 0, 59);
        t.tick();
        assert_eq!(t, ClockTime::new(0, 1, 0));
    }

    #[test]
    fn minutes_roll_into_hours() {
        let mut t = ClockTime::new(4, 59, 59);
        t.tick();
        assert_eq!(t, ClockTime::new(5, 0, 0));
    }

    #[test]
    fn hours_roll_over_at_midnight() {
        let mut t = ClockTime::new(23, 59, 59);
        t.tick();
        assert_eq!(t, ClockTime::MIDNIGHT);
    }

    #[test]
    fn plain_second_does_not_carry() {
        let mut t = ClockTime::new(12, 34, 56);
        t.tick();
        assert_eq!(t, ClockTime::new(12, 34, 57));
    }

    #[test]
    fn full_day_returns_to_start_with_fields_in_range() {
        let mut t = ClockTime::MIDNIGHT;
        for _ in 0..24 * 60 * 60 {
            t.tick();
            assert!(t.hours < 24 && t.mins < 60 && t.secs < 60);
        }
        assert_eq!(t, ClockTime::MIDNIGHT);
    }

    #[test]
    fn new_wraps_out_of_range_fields() {
        assert_eq!(ClockTime::new(24, 60, 61), ClockTime::new(0, 0, 1));
    }

    #[test]
    fn counter_fires_once_every_ten_ticks() {
        let mut c = TickCounter::new();
        let fired: Vec<bool> = (0..30).map(|_| c.tick()).collect();
        let positions: Vec<usize> = fired
            .iter()
            .enumerate()
            .filter(|(_, f)| **f)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(positions, [9, 19, 29]);
        assert_eq!(c.value(), 0);
    }

    #[test]
    fn counter_stays_below_ten() {
        let mut c = TickCounter::new();
        for _ in 0..100 {
            c.tick();
            assert!(c.value() < 10);
        }
    }
}
