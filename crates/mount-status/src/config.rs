//! Indicator configuration
//!
//! Every option the board build would otherwise select with conditional
//! compilation is a field here, resolved once at startup. Components branch
//! on these values, so all hardware variants are exercised by one test
//! binary.

use embassy_time::Duration;
use platform::config::HOUSEKEEPING_PRIORITY;
use platform::{OnLevel, PinId, PinState, Priority};
use thiserror_no_std::Error;

/// Payload address of the persisted sound-enabled byte.
pub const NV_MOUNT_STATUS_BASE: u16 = 0x0040;

/// Scheduler name of the parked-status mirror task.
pub const GENERAL_TASK_NAME: &str = "MtStat";

/// Scheduler name of the mount LED flasher task.
pub const LED_TASK_NAME: &str = "mntLed";

/// Scheduler name of the telescope's own status LED task.
pub const STATUS_LED_TASK_NAME: &str = "StaLed";

/// Interval of the parked-status mirror task.
pub const GENERAL_PERIOD: Duration = Duration::from_millis(1000);

/// Priority tier of both indicator tasks.
pub const TASK_PRIORITY: Priority = Priority(HOUSEKEEPING_PRIORITY);

/// Number of notes in the startup melody.
pub const MELODY_LEN: usize = 3;

/// Mount status LED wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedConfig {
    /// Output pin
    pub pin: PinId,
    /// Level that lights the LED
    pub on_level: OnLevel,
}

/// Buzzer hardware capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BuzzerKind {
    /// No buzzer fitted
    #[default]
    None,
    /// Active buzzer: sounds while the pin is at `on_level`
    OnOff {
        /// Output pin
        pin: PinId,
        /// Level that sounds the buzzer
        on_level: OnLevel,
    },
    /// Passive buzzer driven by a [`platform::ToneOutput`]
    Frequency {
        /// Pin the tone generator drives
        pin: PinId,
    },
}

impl BuzzerKind {
    /// Pin the buzzer is wired to, if one is fitted.
    pub fn pin(self) -> Option<PinId> {
        match self {
            Self::None => None,
            Self::OnOff { pin, .. } | Self::Frequency { pin } => Some(pin),
        }
    }
}

/// One note of the startup melody (or the alert sound).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MelodyNote {
    /// Tone frequency
    pub frequency_hz: u32,
    /// How long the tone generator plays the note
    pub duration: Duration,
}

impl MelodyNote {
    /// Note of `frequency_hz` lasting `duration_ms`.
    pub const fn new(frequency_hz: u32, duration_ms: u64) -> Self {
        Self {
            frequency_hz,
            duration: Duration::from_millis(duration_ms),
        }
    }
}

/// Buzzer options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BuzzerConfig {
    /// Fitted hardware
    pub kind: BuzzerKind,
    /// Play [`Self::melody`] from `play_startup_melody`
    pub startup_melody: bool,
    /// Startup melody notes, played in order
    pub melody: [MelodyNote; MELODY_LEN],
    /// Pause after each melody note
    pub pause: Duration,
    /// Ordinary alert sound
    pub alert: MelodyNote,
    /// Persist the sound-enabled preference across restarts
    pub remember_sound: bool,
    /// Sound-enabled value before anything is loaded
    pub sound_default: bool,
}

impl Default for BuzzerConfig {
    fn default() -> Self {
        Self {
            kind: BuzzerKind::None,
            startup_melody: true,
            melody: [
                MelodyNote::new(1047, 100),
                MelodyNote::new(1319, 100),
                MelodyNote::new(1568, 150),
            ],
            pause: Duration::from_millis(150),
            alert: MelodyNote::new(2000, 100),
            remember_sound: false,
            sound_default: true,
        }
    }
}

/// Parked-status output wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParkStatusConfig {
    /// Output pin
    pub pin: PinId,
    /// Level driven while the mount is parked
    pub parked_level: PinState,
}

/// Complete indicator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusConfig {
    /// Mount status LED, if fitted
    pub led: Option<LedConfig>,
    /// Buzzer options
    pub buzzer: BuzzerConfig,
    /// Parked-status output, if fitted
    pub park_status: Option<ParkStatusConfig>,
    /// Pin of the telescope's own status LED, if it has one
    pub status_led_pin: Option<PinId>,
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Two mount indicators are wired to the same pin
    #[error("pin {0} is assigned to more than one mount indicator")]
    PinConflict(u8),
    /// A melody note has a zero frequency
    #[error("melody note {0} has no frequency")]
    SilentNote(usize),
}

impl StatusConfig {
    /// Check that the mount's own indicators do not share pins and that the
    /// melody is playable.
    ///
    /// Sharing a pin with the telescope status LED is allowed; the mount
    /// takes the pin over on wake.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let led = self.led.map(|l| l.pin);
        let buzzer = self.buzzer.kind.pin();
        let park = self.park_status.map(|p| p.pin);

        for (a, b) in [(led, buzzer), (led, park), (buzzer, park)] {
            if let (Some(a), Some(b)) = (a, b) {
                if a == b {
                    return Err(ConfigError::PinConflict(a.0));
                }
            }
        }

        if let BuzzerKind::Frequency { .. } = self.buzzer.kind {
            if let Some(index) = self.buzzer.melody.iter().position(|n| n.frequency_hz == 0) {
                return Err(ConfigError::SilentNote(index));
            }
        }
        Ok(())
    }

    /// `true` when `pin` is also claimed by the mount LED or buzzer.
    pub(crate) fn claims_pin(&self, pin: PinId) -> bool {
        self.led.is_some_and(|l| l.pin == pin) || self.buzzer.kind.pin() == Some(pin)
    }
}
