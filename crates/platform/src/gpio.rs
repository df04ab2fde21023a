//! GPIO abstraction layer
//!
//! Pins are addressed by number so that subsystems can detect when two
//! features are wired to the same physical line.

/// Physical pin number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId(pub u8);

/// Pin state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    /// High (logic 1)
    High,
    /// Low (logic 0)
    Low,
}

impl PinState {
    /// The opposite level.
    #[must_use]
    pub fn inverted(self) -> Self {
        match self {
            Self::High => Self::Low,
            Self::Low => Self::High,
        }
    }
}

impl From<bool> for PinState {
    fn from(value: bool) -> Self {
        if value {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl From<PinState> for bool {
    fn from(value: PinState) -> Self {
        matches!(value, PinState::High)
    }
}

/// What pin level turns an indicator on (depends on wiring).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OnLevel {
    /// Indicator is active when the pin is HIGH (standard wiring).
    #[default]
    High,
    /// Indicator is active when the pin is LOW (sinking to the pin).
    Low,
}

impl OnLevel {
    /// Pin level that puts the indicator in the requested state.
    #[must_use]
    pub fn level(self, on: bool) -> PinState {
        match (self, on) {
            (Self::High, true) | (Self::Low, false) => PinState::High,
            (Self::High, false) | (Self::Low, true) => PinState::Low,
        }
    }

    /// Pin level that lights the indicator.
    #[must_use]
    pub fn on(self) -> PinState {
        self.level(true)
    }

    /// Pin level that darkens the indicator.
    #[must_use]
    pub fn off(self) -> PinState {
        self.level(false)
    }
}

/// Digital pin mode and write primitives.
///
/// Implemented by the board support layer (and by [`crate::mocks::MockGpio`]
/// on the host). Writes to a pin that was never configured are allowed; the
/// hardware simply ignores them.
pub trait GpioPort {
    /// Error type
    type Error: core::fmt::Debug;

    /// Configure `pin` as a push-pull output.
    fn set_output(&mut self, pin: PinId) -> Result<(), Self::Error>;

    /// Drive `pin` to `state`.
    fn write(&mut self, pin: PinId, state: PinState) -> Result<(), Self::Error>;
}

impl<T: GpioPort + ?Sized> GpioPort for &mut T {
    type Error = T::Error;

    fn set_output(&mut self, pin: PinId) -> Result<(), Self::Error> {
        T::set_output(self, pin)
    }

    fn write(&mut self, pin: PinId, state: PinState) -> Result<(), Self::Error> {
        T::write(self, pin, state)
    }
}
