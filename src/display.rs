use core::convert::Infallible;
use core::fmt;

use crate::clock::ClockTime;
use crate::config::LINE_WIDTH;
use crate::echo::Distance;

/// One display row: exactly `LINE_WIDTH` ASCII characters, space padded.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DisplayLine([u8; LINE_WIDTH]);

impl DisplayLine {
    pub const BLANK: DisplayLine = DisplayLine([b' '; LINE_WIDTH]);

    /// Renders `args` left aligned. Output past the line width is dropped.
    fn render(args: fmt::Arguments) -> Self {
        let mut buf = [b' '; LINE_WIDTH];
        if format_no_std::show(&mut buf, args).is_err() {
            buf = [b' '; LINE_WIDTH];
        }
        Self(buf)
    }

    pub fn as_bytes(&self) -> &[u8; LINE_WIDTH] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl Default for DisplayLine {
    fn default() -> Self {
        Self::BLANK
    }
}

impl fmt::Debug for DisplayLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DisplayLine {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}

/// `"Abstand: 123cm"`, or `"Abstand: ---"` without an echo.
pub fn format_distance(distance: Distance) -> DisplayLine {
    match distance.centimeters() {
        Some(cm) => DisplayLine::render(format_args!("Abstand: {:3}cm", cm)),
        None => DisplayLine::render(format_args!("Abstand: ---")),
    }
}

/// `"Zeit: HH:MM:SS"`.
pub fn format_clock(time: ClockTime) -> DisplayLine {
    DisplayLine::render(format_args!(
        "Zeit: {:02}:{:02}:{:02}",
        time.hours, time.mins, time.secs
    ))
}

/// Display row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Row {
    Distance = 0,
    Clock = 1,
}

impl Row {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Receives the rendered lines once per tick.
pub trait TextSink {
    type Error;

    fn write_line(&mut self, row: Row, line: &DisplayLine) -> Result<(), Self::Error>;
}

/// Sink for builds without a display.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl TextSink for NullSink {
    type Error = Infallible;

    fn write_line(&mut self, _row: Row, _line: &DisplayLine) -> Result<(), Infallible> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_line() {
        let line = format_distance(Distance::from_echo(100, 680, false));
        assert_eq!(line.as_str(), "Abstand:  10cm  ");
    }

    #[test]
    fn wide_distances_still_fit() {
        let line = format_distance(Distance::from_echo(0, u16::MAX, false));
        assert_eq!(line.as_str(), "Abstand: 1129cm ");
        let line = format_distance(Distance::from_echo(0, 0, false));
        assert_eq!(line.as_str(), "Abstand:   0cm  ");
    }

    #[test]
    fn missing_echo_line() {
        let line = format_distance(Distance::NO_ECHO);
        assert_eq!(line.as_str(), "Abstand: ---    ");
    }

    #[test]
    fn clock_line_is_zero_padded() {
        assert_eq!(format_clock(ClockTime::new(7, 5, 9)).as_str(), "Zeit: 07:05:09  ");
        assert_eq!(format_clock(ClockTime::new(23, 59, 59)).as_str(), "Zeit: 23:59:59  ");
        assert_eq!(format_clock(ClockTime::MIDNIGHT).as_str(), "Zeit: 00:00:00  ");
    }

    #[test]
    fn lines_are_always_sixteen_characters() {
        for width in [0u16, 57, 58, 5800, 40_000, u16::MAX] {
            let line = format_distance(Distance::from_echo(0, width, false));
            assert_eq!(line.as_str().len(), LINE_WIDTH);
        }
        assert_eq!(format_distance(Distance::NO_ECHO).as_bytes().len(), LINE_WIDTH);
        assert_eq!(format_clock(ClockTime::new(1, 2, 3)).as_str().len(), LINE_WIDTH);
    }

    #[test]
    fn formatting_is_deterministic() {
        let d = Distance::from_echo(10, 6000, false);
        assert_eq!(format_distance(d), format_distance(d));
        let t = ClockTime::new(13, 37, 0);
        assert_eq!(format_clock(t), format_clock(t));
    }

    #[test]
    fn rows_index_the_line_pair() {
        assert_eq!(Row::Distance.index(), 0);
        assert_eq!(Row::Clock.index(), 1);
    }
}
