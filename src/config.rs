//! Fixed compile-time configuration.

/// Period of the low-priority scheduler tick.
pub const TICK_PERIOD_MS: u32 = 100;

/// Ticks per clock second.
pub const TICKS_PER_SECOND: u8 = (1000 / TICK_PERIOD_MS) as u8;

/// Full-scale count of a 16-bit timer.
pub const TIMER_RANGE: u32 = 0x1_0000;

/// Input clock of the echo and tick timers (1 tick = 1 us).
pub const TIMER_CLOCK_HZ: u32 = 1_000_000;

/// Hardware prescaler in front of the tick timer.
pub const TICK_TIMER_PRESCALER: u32 = 2;

/// Value loaded into the tick timer so that it overflows once per tick.
pub const TICK_RELOAD: u16 = periodic_reload(
    TIMER_RANGE,
    TIMER_CLOCK_HZ / TICK_TIMER_PRESCALER,
    TICK_PERIOD_MS,
);

/// Echo round trip time per centimeter at 1 us per timer tick.
pub const MICROS_PER_CM: u16 = 58;

/// Minimum trigger pulse width required by the HC-SR04 datasheet.
pub const TRIGGER_PULSE_US: u32 = 10;

/// Characters per display row.
pub const LINE_WIDTH: usize = 16;

/// Where the two display lines go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    /// Four chained MAX7219 eight-digit modules, two per row.
    SevenSegment,
    /// Lines are written to the defmt log (no display attached).
    Log,
    /// Lines are dropped.
    Off,
}

pub const DISPLAY_MODE: DisplayMode = DisplayMode::SevenSegment;

/// Reload value for an up-counting timer of `range` counts clocked at
/// `rate_hz` so that it overflows after `period_ms`.
pub const fn periodic_reload(range: u32, rate_hz: u32, period_ms: u32) -> u16 {
    (range - rate_hz / 1000 * period_ms) as u16
}

/// Time between two overflows for a timer reloaded with `reload`, in
/// microseconds of a `TIMER_CLOCK_HZ` timebase.
pub const fn reload_period_us(reload: u16, prescaler: u32) -> u32 {
    (TIMER_RANGE - reload as u32) * prescaler * (1_000_000 / TIMER_CLOCK_HZ)
}

const _: () = assert!(TIMER_CLOCK_HZ / TICK_TIMER_PRESCALER / 1000 * TICK_PERIOD_MS < TIMER_RANGE);
const _: () = assert!(TICKS_PER_SECOND as u32 * TICK_PERIOD_MS == 1000);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reload_matches_hundred_ms_at_prescaler_two() {
        assert_eq!(TICK_RELOAD, 0x3CB0);
    }

    #[test]
    fn reload_round_trips_to_tick_period() {
        assert_eq!(
            reload_period_us(TICK_RELOAD, TICK_TIMER_PRESCALER),
            TICK_PERIOD_MS * 1000
        );
    }

    #[test]
    fn reload_without_prescaler() {
        // 10 ms at 1 MHz: 10_000 counts before overflow
        assert_eq!(periodic_reload(0x1_0000, 1_000_000, 10), 0xD8F0);
    }

    #[test]
    fn ten_ticks_per_second() {
        assert_eq!(TICKS_PER_SECOND, 10);
    }
}
