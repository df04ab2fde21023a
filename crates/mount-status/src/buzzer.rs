//! Buzzer and startup melody sequencer.
//!
//! Each buzzer variant turns a sound request into a short list of
//! [`SoundStep`]s; one executor plays any list. Playback blocks the caller
//! through [`DelayNs`], which is only acceptable before steady-state
//! scheduling starts (the startup melody) or for very short sounds.

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;
use heapless::Vec;
use platform::{GpioPort, ToneOutput};

use crate::config::{BuzzerConfig, BuzzerKind, MelodyNote, MELODY_LEN};

/// Beep length (and gap) used by on/off buzzers in place of the melody.
pub const SIMPLE_BEEP: Duration = Duration::from_millis(100);

/// Number of beeps an on/off buzzer plays in place of the melody.
pub const SIMPLE_BEEP_COUNT: usize = 3;

const MAX_STEPS: usize = 16;

// Every sequence below fits, so discarded push results never drop a step.
#[allow(clippy::arithmetic_side_effects)]
const _: () = assert!(MELODY_LEN * 2 + 1 <= MAX_STEPS && SIMPLE_BEEP_COUNT * 4 <= MAX_STEPS);

/// One primitive buzzer action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SoundStep {
    /// Start a tone on a frequency-capable buzzer
    Tone(MelodyNote),
    /// Drive an on/off buzzer on (`true`) or off (`false`)
    Level(bool),
    /// Block for this long
    Pause(Duration),
    /// Silence the tone output
    Silence,
}

/// Sequence of steps for one sound.
pub type SoundSequence = Vec<SoundStep, MAX_STEPS>;

/// Steps of the startup melody for `kind`.
///
/// Frequency buzzers play the configured notes, each followed by the
/// configured pause, then fall silent. On/off buzzers cannot pitch a note
/// and beep [`SIMPLE_BEEP_COUNT`] times instead. No buzzer, no steps.
pub fn startup_sequence(kind: BuzzerKind, config: &BuzzerConfig) -> SoundSequence {
    let mut steps = SoundSequence::new();
    match kind {
        BuzzerKind::None => {}
        BuzzerKind::Frequency { .. } => {
            for note in config.melody {
                let _ = steps.push(SoundStep::Tone(note));
                let _ = steps.push(SoundStep::Pause(config.pause));
            }
            let _ = steps.push(SoundStep::Silence);
        }
        BuzzerKind::OnOff { .. } => {
            for _ in 0..SIMPLE_BEEP_COUNT {
                let _ = steps.push(SoundStep::Level(true));
                let _ = steps.push(SoundStep::Pause(SIMPLE_BEEP));
                let _ = steps.push(SoundStep::Level(false));
                let _ = steps.push(SoundStep::Pause(SIMPLE_BEEP));
            }
        }
    }
    steps
}

/// Steps of one ordinary alert for `kind`.
pub fn alert_sequence(kind: BuzzerKind, alert: MelodyNote) -> SoundSequence {
    let mut steps = SoundSequence::new();
    match kind {
        BuzzerKind::None => {}
        BuzzerKind::Frequency { .. } => {
            let _ = steps.push(SoundStep::Tone(alert));
        }
        BuzzerKind::OnOff { .. } => {
            let _ = steps.push(SoundStep::Level(true));
            let _ = steps.push(SoundStep::Pause(alert.duration));
            let _ = steps.push(SoundStep::Level(false));
        }
    }
    steps
}

/// The fitted buzzer and the tone generator behind it.
pub struct Buzzer<T> {
    kind: BuzzerKind,
    tone: T,
    ready: bool,
}

impl<T: ToneOutput> Buzzer<T> {
    /// Buzzer of the given kind. Call [`Buzzer::init`] before playing.
    pub fn new(kind: BuzzerKind, tone: T) -> Self {
        Self {
            kind,
            tone,
            ready: false,
        }
    }

    /// Fitted hardware.
    pub fn kind(&self) -> BuzzerKind {
        self.kind
    }

    /// `true` after a successful [`Buzzer::init`].
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Configure the buzzer line and make sure it is quiet.
    pub fn init<G: GpioPort>(&mut self, gpio: &mut G) {
        self.ready = match self.kind {
            BuzzerKind::None => false,
            BuzzerKind::OnOff { pin, on_level } => {
                gpio.set_output(pin).is_ok() && gpio.write(pin, on_level.off()).is_ok()
            }
            BuzzerKind::Frequency { pin } => {
                gpio.set_output(pin).is_ok() && self.tone.no_tone().is_ok()
            }
        };
        if !self.ready && self.kind != BuzzerKind::None {
            warn!("MSG: Mount, status buzzer init failed");
        }
    }

    /// Play `steps`, blocking through every pause.
    ///
    /// A failed write is logged and playback continues with the next step.
    pub fn play<G: GpioPort, D: DelayNs>(&mut self, gpio: &mut G, delay: &mut D, steps: &[SoundStep]) {
        let mut failures = 0u32;
        for step in steps {
            let ok = match *step {
                SoundStep::Tone(note) => self.tone.tone(note.frequency_hz, note.duration).is_ok(),
                SoundStep::Silence => self.tone.no_tone().is_ok(),
                SoundStep::Level(on) => match self.kind {
                    BuzzerKind::OnOff { pin, on_level } => gpio.write(pin, on_level.level(on)).is_ok(),
                    BuzzerKind::None | BuzzerKind::Frequency { .. } => true,
                },
                SoundStep::Pause(duration) => {
                    delay.delay_ms(u32::try_from(duration.as_millis()).unwrap_or(u32::MAX));
                    true
                }
            };
            if !ok {
                failures = failures.saturating_add(1);
            }
        }
        if failures > 0 {
            warn!("MSG: Mount, status buzzer {} output writes failed", failures);
        }
    }
}
