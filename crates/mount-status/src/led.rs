//! Mount status LED flash state machine.
//!
//! A flash rate in milliseconds selects one of three behaviours:
//!
//! | `period_ms` | Mode                  | Task interval      |
//! |-------------|-----------------------|--------------------|
//! | `0`         | [`IndicatorMode::Off`] | 250 ms (refresh)   |
//! | `1`         | [`IndicatorMode::On`]  | 250 ms (refresh)   |
//! | `n >= 2`    | [`IndicatorMode::Blinking`] | `n / 2` ms    |
//!
//! Each tick of a blinking LED flips the line once, so a full on+off cycle
//! spans `period_ms`. Held modes rewrite their level on every tick, which
//! repairs the line after any stray write to the same pin.

use core::num::NonZeroU32;

use embassy_time::Duration;
use platform::{GpioPort, PinState};

use crate::config::LedConfig;

/// Nominal cycle used to pace the refresh of a held (off/on) LED.
const HELD_REFRESH_CYCLE_MS: u32 = 500;

/// Flash period of the default heartbeat.
pub const HEARTBEAT_PERIOD_MS: u32 = 1000;

/// What the LED is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndicatorMode {
    /// Held at the off level
    Off,
    /// Held at the on level
    On,
    /// Toggling with a full cycle of `period_ms`
    Blinking(NonZeroU32),
}

impl IndicatorMode {
    /// Decode a flash rate: 0 is off, 1 is on, anything else blinks.
    pub fn from_period(period_ms: u32) -> Self {
        match period_ms {
            0 => Self::Off,
            1 => Self::On,
            n => NonZeroU32::new(n).map_or(Self::Off, Self::Blinking),
        }
    }

    /// Interval between ticks for this mode.
    pub fn tick_interval(self) -> Duration {
        let cycle_ms = match self {
            Self::Off | Self::On => HELD_REFRESH_CYCLE_MS,
            Self::Blinking(period) => period.get(),
        };
        Duration::from_millis(u64::from(cycle_ms / 2))
    }
}

impl Default for IndicatorMode {
    fn default() -> Self {
        Self::from_period(HEARTBEAT_PERIOD_MS)
    }
}

/// LED output state machine, ticked by the scheduler.
pub struct LedFlasher {
    config: LedConfig,
    mode: IndicatorMode,
    cycle: u8,
}

impl LedFlasher {
    /// Flasher for the LED described by `config`, starting on the heartbeat.
    pub fn new(config: LedConfig) -> Self {
        Self {
            config,
            mode: IndicatorMode::default(),
            cycle: 0,
        }
    }

    /// Current mode.
    pub fn mode(&self) -> IndicatorMode {
        self.mode
    }

    /// LED wiring.
    pub fn config(&self) -> LedConfig {
        self.config
    }

    /// Switch mode and return the task interval the new mode needs.
    pub fn set_rate(&mut self, period_ms: u32) -> Duration {
        self.mode = IndicatorMode::from_period(period_ms);
        self.mode.tick_interval()
    }

    /// Level the next tick will write. Does not advance the blink parity.
    pub fn next_level(&self) -> PinState {
        let on = match self.mode {
            IndicatorMode::Off => false,
            IndicatorMode::On => true,
            IndicatorMode::Blinking(_) => self.cycle & 1 == 1,
        };
        self.config.on_level.level(on)
    }

    /// Drive the line for one tick.
    ///
    /// Blinking alternates using an internal parity counter rather than
    /// reading the pin back: even ticks write off, odd ticks write on.
    pub fn tick<G: GpioPort>(&mut self, gpio: &mut G) -> Result<PinState, G::Error> {
        let level = self.next_level();
        if let IndicatorMode::Blinking(_) = self.mode {
            self.cycle = self.cycle.wrapping_add(1);
        }
        gpio.write(self.config.pin, level)?;
        Ok(level)
    }
}
