use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::digital::v2::OutputPin;

use crate::config::TRIGGER_PULSE_US;

/// Drives the sensor's trigger input.
///
/// The pulse is held high for a fixed, blocking `TRIGGER_PULSE_US`, the
/// minimum width the HC-SR04 datasheet requires. A capture interrupt landing
/// inside the pulse can only stretch it, never shorten it.
pub struct TriggerPulse<P, D> {
    pin: P,
    delay: D,
}

impl<P, D> TriggerPulse<P, D>
where
    P: OutputPin,
    D: DelayUs<u32>,
{
    /// Takes the trigger pin and drives it low.
    pub fn new(mut pin: P, delay: D) -> Result<Self, P::Error> {
        pin.set_low()?;
        Ok(Self { pin, delay })
    }

    /// Emits one trigger pulse. Starts a new echo cycle.
    pub fn emit(&mut self) -> Result<(), P::Error> {
        self.pin.set_high()?;
        self.delay.delay_us(TRIGGER_PULSE_US);
        self.pin.set_low()
    }
}
