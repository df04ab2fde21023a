//! Mount status lifecycle controller.
//!
//! [`MountStatus`] owns every piece of indicator state: the one-shot
//! lifecycle flags, the LED flash state machine, the buzzer and the cached
//! sound preference. The controller calls it from its single scheduler
//! context:
//!
//! 1. [`MountStatus::init`] once at boot registers the parked-status mirror
//!    and restores the sound preference.
//! 2. [`MountStatus::wake`] on first use registers the LED flasher and
//!    prepares the buzzer. Later calls do nothing.
//! 3. [`MountStatus::run`] handles every due task handle the scheduler
//!    returns; [`MountStatus::flash_rate`] reconfigures the LED at runtime.
//!
//! Nothing here returns an error. A refused task registration or a failed
//! storage access is logged and leaves that one feature inactive.

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;
use embedded_storage::Storage;
use platform::{GpioPort, NvStore, TaskHandle, TaskScheduler, ToneOutput};

use crate::buzzer::{alert_sequence, startup_sequence, Buzzer};
use crate::config::{
    BuzzerKind, ConfigError, StatusConfig, GENERAL_PERIOD, GENERAL_TASK_NAME, LED_TASK_NAME,
    STATUS_LED_TASK_NAME, TASK_PRIORITY,
};
use crate::general::{mirror_park_state, ParkState};
use crate::led::{IndicatorMode, LedFlasher};
use crate::preference::SoundPreference;

/// One-shot lifecycle flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LifecycleState {
    /// [`MountStatus::init`] has run
    pub initialized: bool,
    /// [`MountStatus::wake`] has run
    pub awake: bool,
}

/// Mount status LED, buzzer and parked-status output.
pub struct MountStatus<G, T> {
    config: StatusConfig,
    gpio: G,
    buzzer: Buzzer<T>,
    led: Option<LedFlasher>,
    sound: SoundPreference,
    lifecycle: LifecycleState,
    general_task: Option<TaskHandle>,
    led_task: Option<TaskHandle>,
}

impl<G: GpioPort, T: ToneOutput> MountStatus<G, T> {
    /// Validate `config` and take ownership of the indicator hardware.
    ///
    /// Pass [`platform::NoTone`] as `tone` on boards without a
    /// frequency-capable buzzer.
    pub fn new(config: StatusConfig, gpio: G, tone: T) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            gpio,
            buzzer: Buzzer::new(config.buzzer.kind, tone),
            led: config.led.map(LedFlasher::new),
            sound: SoundPreference::new(config.buzzer.sound_default),
            lifecycle: LifecycleState::default(),
            general_task: None,
            led_task: None,
        })
    }

    /// Seed or restore the sound preference and start the parked-status
    /// mirror (1 s rate, priority 4).
    ///
    /// Without a valid key in `nv` the default preference is written, but
    /// the key itself is left alone: stamping it with
    /// [`NvStore::mark_valid`] is up to the controller once every subsystem
    /// has seeded its defaults. Until then each boot reseeds the default
    /// and a stored preference does not survive a restart.
    pub fn init<S, N>(&mut self, tasks: &mut S, nv: &mut NvStore<N>)
    where
        S: TaskScheduler,
        N: Storage,
    {
        if self.lifecycle.initialized {
            debug!("MSG: Mount, status already initialized");
            return;
        }

        if !nv.has_valid_key() {
            info!("MSG: Mount, status writing defaults to NV");
            if let Err(e) = self.sound.store(nv) {
                warn!("MSG: Mount, status NV default write failed: {}", e);
            }
        }

        if self.config.buzzer.remember_sound {
            match SoundPreference::load(nv) {
                Ok(sound) => self.sound = sound,
                Err(e) => warn!("MSG: Mount, status NV read failed: {}", e),
            }
        }

        if let Some(park) = self.config.park_status {
            if self.gpio.set_output(park.pin).is_err() {
                warn!("MSG: Mount, status park pin {} setup failed", park.pin.0);
            }
        }

        match tasks.add(GENERAL_PERIOD, TASK_PRIORITY, GENERAL_TASK_NAME) {
            Ok(handle) => {
                self.general_task = Some(handle);
                info!("MSG: Mount, status start general status task (1s rate priority 4)... success");
            }
            Err(e) => {
                warn!("MSG: Mount, status start general status task (1s rate priority 4)... FAILED! {}", e);
            }
        }

        self.lifecycle.initialized = true;
    }

    /// Start the LED flasher and the buzzer on first call; later calls are
    /// no-ops.
    pub fn wake<S: TaskScheduler>(&mut self, tasks: &mut S) {
        if self.lifecycle.awake {
            return;
        }

        // Last claimant of a shared pin wins.
        if let Some(pin) = self.config.status_led_pin {
            if self.config.claims_pin(pin) {
                if let Some(handle) = tasks.handle_by_name(STATUS_LED_TASK_NAME) {
                    if tasks.remove(handle).is_ok() {
                        info!("MSG: Mount, status took over status LED pin {}", pin.0);
                    }
                }
            }
        }

        if let Some(led) = &self.led {
            self.led_task = match tasks.handle_by_name(LED_TASK_NAME) {
                Some(existing) => Some(existing),
                None => {
                    let pin = led.config().pin;
                    if self.gpio.set_output(pin).is_err() {
                        warn!("MSG: Mount, status LED pin {} setup failed", pin.0);
                    }
                    match tasks.add(Duration::from_millis(0), TASK_PRIORITY, LED_TASK_NAME) {
                        Ok(handle) => {
                            info!("MSG: Mount, status start LED task (variable rate priority 4)... success");
                            Some(handle)
                        }
                        Err(e) => {
                            warn!("MSG: Mount, status start LED task (variable rate priority 4)... FAILED! {}", e);
                            None
                        }
                    }
                }
            };
            if let Some(handle) = self.led_task {
                if tasks.set_period(handle, led.mode().tick_interval()).is_err() {
                    warn!("MSG: Mount, status LED task period update failed");
                }
            }
        }

        if self.buzzer.kind() != BuzzerKind::None {
            info!("MSG: Mount, status start buzzer");
            self.buzzer.init(&mut self.gpio);
        }

        self.lifecycle.awake = true;
    }

    /// Set the LED flash period in milliseconds: 0 holds it off, 1 holds it
    /// on, anything else blinks with that full-cycle period.
    ///
    /// Does nothing on a mount without a status LED.
    pub fn flash_rate<S: TaskScheduler>(&mut self, tasks: &mut S, period_ms: u32) {
        let Some(led) = self.led.as_mut() else {
            return;
        };
        let interval = led.set_rate(period_ms);
        if let Some(handle) = self.led_task {
            if tasks.set_period(handle, interval).is_err() {
                warn!("MSG: Mount, status LED task period update failed");
            }
        }
    }

    /// Dispatch a due scheduler handle. Returns `false` when the handle
    /// belongs to another subsystem.
    pub fn run(&mut self, handle: TaskHandle, park: ParkState) -> bool {
        if self.general_task == Some(handle) {
            self.general(park);
            true
        } else if self.led_task == Some(handle) {
            self.flash();
            true
        } else {
            false
        }
    }

    /// General status tick: mirror `park` onto the parked-status output.
    pub fn general(&mut self, park: ParkState) {
        if mirror_park_state(self.config.park_status, &mut self.gpio, park).is_err() {
            debug!("MSG: Mount, status park output write failed");
        }
    }

    /// LED tick.
    pub fn flash(&mut self) {
        if let Some(led) = self.led.as_mut() {
            if led.tick(&mut self.gpio).is_err() {
                debug!("MSG: Mount, status LED write failed");
            }
        }
    }

    /// Play the startup melody, waking the buzzer first.
    ///
    /// Plays regardless of the sound preference. Blocks through `delay`
    /// for the whole melody, so call it before steady-state scheduling.
    pub fn play_startup_melody<S, D>(&mut self, tasks: &mut S, delay: &mut D)
    where
        S: TaskScheduler,
        D: DelayNs,
    {
        if !self.config.buzzer.startup_melody || self.buzzer.kind() == BuzzerKind::None {
            return;
        }
        self.wake(tasks);
        let steps = startup_sequence(self.buzzer.kind(), &self.config.buzzer);
        self.buzzer.play(&mut self.gpio, delay, &steps);
    }

    /// Play the ordinary alert sound if sound is enabled and the buzzer is
    /// ready. Returns whether anything was played.
    pub fn alert<D: DelayNs>(&mut self, delay: &mut D) -> bool {
        if !self.sound.enabled || !self.buzzer.is_ready() {
            return false;
        }
        let steps = alert_sequence(self.buzzer.kind(), self.config.buzzer.alert);
        self.buzzer.play(&mut self.gpio, delay, &steps);
        true
    }

    /// Change the sound preference, persisting it when sound memory is on.
    pub fn set_sound_enabled<N: Storage>(&mut self, nv: &mut NvStore<N>, enabled: bool) {
        self.sound = SoundPreference::new(enabled);
        if self.config.buzzer.remember_sound {
            if let Err(e) = self.sound.store(nv) {
                warn!("MSG: Mount, status NV write failed: {}", e);
            }
        }
    }

    /// Whether ordinary sounds are enabled.
    pub fn sound_enabled(&self) -> bool {
        self.sound.enabled
    }

    /// Current LED mode, `None` without a status LED.
    pub fn led_mode(&self) -> Option<IndicatorMode> {
        self.led.as_ref().map(LedFlasher::mode)
    }

    /// Lifecycle flags.
    pub fn lifecycle(&self) -> LifecycleState {
        self.lifecycle
    }

    /// `true` once [`MountStatus::init`] has run.
    pub fn is_initialized(&self) -> bool {
        self.lifecycle.initialized
    }

    /// `true` once [`MountStatus::wake`] has run.
    pub fn is_awake(&self) -> bool {
        self.lifecycle.awake
    }

    /// Handle of the parked-status mirror task, if registered.
    pub fn general_task(&self) -> Option<TaskHandle> {
        self.general_task
    }

    /// Handle of the LED flasher task, if registered.
    pub fn led_task(&self) -> Option<TaskHandle> {
        self.led_task
    }

    /// Active configuration.
    pub fn config(&self) -> &StatusConfig {
        &self.config
    }

    /// Indicator GPIO port.
    pub fn gpio(&self) -> &G {
        &self.gpio
    }

    /// Mutable indicator GPIO port.
    pub fn gpio_mut(&mut self) -> &mut G {
        &mut self.gpio
    }

    /// Buzzer state.
    pub fn buzzer(&self) -> &Buzzer<T> {
        &self.buzzer
    }
}
