//! Tone output abstraction
//!
//! A frequency-capable buzzer: a PWM channel or timer toggling a pin at an
//! audio rate. Starting a tone returns immediately; the hardware stops it
//! after `duration` on its own.

use embassy_time::Duration;

/// Frequency-capable buzzer output
pub trait ToneOutput {
    /// Error type
    type Error: core::fmt::Debug;

    /// Start a tone at `frequency_hz` that ends by itself after `duration`.
    fn tone(&mut self, frequency_hz: u32, duration: Duration) -> Result<(), Self::Error>;

    /// Silence the output immediately.
    fn no_tone(&mut self) -> Result<(), Self::Error>;
}

impl<T: ToneOutput + ?Sized> ToneOutput for &mut T {
    type Error = T::Error;

    fn tone(&mut self, frequency_hz: u32, duration: Duration) -> Result<(), Self::Error> {
        T::tone(self, frequency_hz, duration)
    }

    fn no_tone(&mut self) -> Result<(), Self::Error> {
        T::no_tone(self)
    }
}

/// Tone output for boards without a frequency-capable buzzer.
///
/// Every call succeeds and does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTone;

impl ToneOutput for NoTone {
    type Error = core::convert::Infallible;

    fn tone(&mut self, _frequency_hz: u32, _duration: Duration) -> Result<(), Self::Error> {
        Ok(())
    }

    fn no_tone(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
