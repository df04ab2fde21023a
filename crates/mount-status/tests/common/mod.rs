//! Shared host-side bench: a task table driven by a virtual millisecond clock.

// Test files use unwrap() for readable assertions.
#![allow(clippy::unwrap_used)]
#![allow(dead_code)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]

use embassy_time::Instant;
use mount_status::{LedConfig, MountStatus, ParkState, ParkStatusConfig, StatusConfig};
use platform::mocks::{MockFlash, MockGpio};
use platform::{NoTone, NvStore, OnLevel, PinId, PinState, TaskTable, ToneOutput};

pub const LED_PIN: PinId = PinId(13);
pub const PARK_PIN: PinId = PinId(7);
pub const STATUS_LED_PIN: PinId = PinId(2);

pub type Tasks = TaskTable<8>;
pub type Nv = NvStore<MockFlash<256>>;

/// Config with an active-high LED and an active-high parked output.
pub fn led_and_park_config() -> StatusConfig {
    StatusConfig {
        led: Some(LedConfig {
            pin: LED_PIN,
            on_level: OnLevel::High,
        }),
        park_status: Some(ParkStatusConfig {
            pin: PARK_PIN,
            parked_level: PinState::High,
        }),
        ..StatusConfig::default()
    }
}

pub fn blank_nv() -> Nv {
    NvStore::new(MockFlash::blank())
}

/// Build, init and wake a status instance without a tone buzzer.
pub fn started(config: StatusConfig, tasks: &mut Tasks, nv: &mut Nv) -> MountStatus<MockGpio, NoTone> {
    let mut status = MountStatus::new(config, MockGpio::new(), NoTone).unwrap();
    status.init(tasks, nv);
    status.wake(tasks);
    status
}

/// Virtual clock stepping one millisecond at a time.
pub struct Clock {
    pub now_ms: u64,
}

impl Clock {
    pub fn new() -> Self {
        Self { now_ms: 0 }
    }

    /// Run every due task for `duration_ms` milliseconds, calling `sample`
    /// once per millisecond after dispatch.
    pub fn run<T: ToneOutput>(
        &mut self,
        tasks: &mut Tasks,
        status: &mut MountStatus<MockGpio, T>,
        park: ParkState,
        duration_ms: u64,
        mut sample: impl FnMut(u64, &MockGpio),
    ) {
        for _ in 0..duration_ms {
            let now = Instant::from_millis(self.now_ms);
            while let Some(handle) = tasks.poll(now) {
                assert!(status.run(handle, park), "unexpected task handle");
            }
            sample(self.now_ms, status.gpio());
            self.now_ms += 1;
        }
    }
}

/// Lengths of the complete runs of equal levels (first and last runs are
/// dropped as possibly partial).
pub fn inner_run_lengths(levels: &[PinState]) -> Vec<usize> {
    let mut runs = Vec::new();
    let mut iter = levels.iter();
    let Some(mut current) = iter.next() else {
        return runs;
    };
    let mut len = 1;
    for level in iter {
        if level == current {
            len += 1;
        } else {
            runs.push(len);
            current = level;
            len = 1;
        }
    }
    runs.push(len);
    if runs.len() <= 2 {
        return Vec::new();
    }
    runs[1..runs.len() - 1].to_vec()
}
