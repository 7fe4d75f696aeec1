//! RP2040 side of the peripheral seams.

use core::convert::Infallible;

use max7219::{connectors::SpiConnectorSW, DataError, DecodeMode, MAX7219};
use rp_pico::hal::{
    fugit::ExtU32,
    gpio::{
        bank0::{Gpio14, Gpio15, Gpio16, Gpio17, Gpio18, Gpio19},
        FunctionSio, FunctionSpi, Interrupt, Pin, PullDown, SioInput, SioOutput,
    },
    pac::SPI0,
    spi::{Enabled, Spi},
    timer::{Alarm, Alarm0, Timer},
};
use rtic::Mutex;

use ultrasonic_clock::{
    config::{reload_period_us, TICK_TIMER_PRESCALER},
    CaptureUnit, DisplayLine, Distance, Edge, NullSink, Row, TextSink, TickPorts, TriggerPulse,
};

pub type EchoPin = Pin<Gpio15, FunctionSio<SioInput>, PullDown>;
pub type TriggerPin = Pin<Gpio14, FunctionSio<SioOutput>, PullDown>;
pub type Trigger = TriggerPulse<TriggerPin, cortex_m::delay::Delay>;

pub type Spi0 = Spi<
    Enabled,
    SPI0,
    (
        Pin<Gpio19, FunctionSpi, PullDown>,
        Pin<Gpio16, FunctionSpi, PullDown>,
        Pin<Gpio18, FunctionSpi, PullDown>,
    ),
>;
pub type CsPin = Pin<Gpio17, FunctionSio<SioOutput>, PullDown>;
type DisplayType = MAX7219<SpiConnectorSW<Spi0, CsPin>>;

fn irq(edge: Edge) -> Interrupt {
    match edge {
        Edge::Rising => Interrupt::EdgeHigh,
        Edge::Falling => Interrupt::EdgeLow,
    }
}

/// Free-running 1 MHz timer standing in for a 16-bit capture timer.
///
/// The RP2040 has no input capture, so the "capture register" is the
/// system timer read at interrupt entry, relative to the last reset.
pub struct EchoTimer {
    timer: Timer,
    base: u32,
    overflow_mark: u32,
}

impl EchoTimer {
    pub fn new(timer: Timer) -> Self {
        let base = timer.get_counter_low();
        Self {
            timer,
            base,
            overflow_mark: 0,
        }
    }

    fn elapsed(&self) -> u32 {
        self.timer.get_counter_low().wrapping_sub(self.base)
    }

    /// Number of 16-bit wraps since the last reset.
    fn wraps(&self) -> u32 {
        self.elapsed() >> 16
    }

    pub fn reset(&mut self) {
        self.base = self.timer.get_counter_low();
        self.overflow_mark = 0;
    }
}

/// The echo GPIO and the edge its interrupt is armed for.
pub struct EchoInput {
    pin: EchoPin,
    armed: Edge,
}

impl EchoInput {
    pub fn new(mut pin: EchoPin) -> Self {
        pin.clear_interrupt(Interrupt::EdgeLow);
        pin.clear_interrupt(Interrupt::EdgeHigh);
        pin.set_interrupt_enabled(irq(Edge::Rising), true);
        Self {
            pin,
            armed: Edge::Rising,
        }
    }
}

/// Capture unit view for the duration of one echo interrupt.
pub struct EchoPort<'a> {
    input: &'a mut EchoInput,
    timer: &'a mut EchoTimer,
    fired: Edge,
}

impl<'a> EchoPort<'a> {
    pub fn new(input: &'a mut EchoInput, timer: &'a mut EchoTimer) -> Self {
        let fired = input.armed;
        Self {
            input,
            timer,
            fired,
        }
    }
}

impl CaptureUnit for EchoPort<'_> {
    fn configure_capture(&mut self, edge: Edge) {
        let pin = &mut self.input.pin;
        pin.set_interrupt_enabled(irq(self.input.armed), false);
        // edge status latches even while disabled
        pin.clear_interrupt(irq(edge));
        pin.set_interrupt_enabled(irq(edge), true);
        self.input.armed = edge;
    }

    fn read_capture(&mut self) -> u16 {
        self.timer.elapsed() as u16
    }

    fn timer_overflowed(&mut self) -> bool {
        self.timer.wraps() > self.timer.overflow_mark
    }

    fn clear_timer_overflow(&mut self) {
        self.timer.overflow_mark = self.timer.wraps();
    }

    fn clear_capture_interrupt(&mut self) {
        self.input.pin.clear_interrupt(irq(self.fired));
    }
}

/// Tick interrupt view: the tick alarm plus the two resources shared with
/// the echo interrupt. Both are read through RTIC locks.
pub struct TickHw<'a, D, E> {
    pub alarm: &'a mut Alarm0,
    pub distance: D,
    pub echo_timer: E,
}

impl<D, E> TickPorts for TickHw<'_, D, E>
where
    D: Mutex<T = Distance>,
    E: Mutex<T = EchoTimer>,
{
    fn reload_periodic(&mut self, value: u16) {
        let period = reload_period_us(value, TICK_TIMER_PRESCALER);
        if self.alarm.schedule(period.micros()).is_err() {
            defmt::warn!("tick alarm not rescheduled");
        }
    }

    fn read_distance(&mut self) -> Distance {
        self.distance.lock(|d| *d)
    }

    fn reset_echo_timer(&mut self) {
        self.echo_timer.lock(|t| t.reset());
    }

    fn clear_tick_interrupt(&mut self) {
        self.alarm.clear_interrupt();
    }
}

const DEVICES: usize = 4;
const DIGITS: usize = 8;

/// Two rows of two chained MAX7219 eight-digit modules.
pub struct SevenSegment {
    display: DisplayType,
}

impl SevenSegment {
    pub fn new(spi: Spi0, cs: CsPin) -> Result<Self, DataError> {
        let mut display = MAX7219::from_spi_cs(DEVICES, spi, cs)?;
        display.power_on()?;
        for i in 0..DEVICES {
            display.set_decode_mode(i, DecodeMode::NoDecode)?;
            display.set_intensity(i, 0x4)?;
            display.clear_display(i)?;
        }
        Ok(Self { display })
    }
}

impl TextSink for SevenSegment {
    type Error = DataError;

    fn write_line(&mut self, row: Row, line: &DisplayLine) -> Result<(), DataError> {
        for (half, chunk) in line.as_bytes().chunks_exact(DIGITS).enumerate() {
            let mut digits = [b' '; DIGITS];
            digits.copy_from_slice(chunk);
            self.display.write_str(row.index() * 2 + half, &digits, 0)?;
        }
        Ok(())
    }
}

/// Writes the lines to the defmt log instead of a display.
pub struct LogSink;

impl TextSink for LogSink {
    type Error = Infallible;

    fn write_line(&mut self, row: Row, line: &DisplayLine) -> Result<(), Infallible> {
        defmt::info!("{}: {}", row, line);
        Ok(())
    }
}

/// Text sink picked once at startup from `config::DISPLAY_MODE`.
pub enum Sink {
    SevenSegment(SevenSegment),
    Log(LogSink),
    Off(NullSink),
}

impl TextSink for Sink {
    type Error = DataError;

    fn write_line(&mut self, row: Row, line: &DisplayLine) -> Result<(), DataError> {
        match self {
            Sink::SevenSegment(s) => s.write_line(row, line),
            Sink::Log(s) => s.write_line(row, line).map_err(|e| match e {}),
            Sink::Off(s) => s.write_line(row, line).map_err(|e| match e {}),
        }
    }
}
