//! Mount status indicators
//!
//! Drives the mount's status LED, its buzzer and a "parked" output line as
//! cooperatively scheduled tasks next to the motion-control tasks.
//!
//! # Architecture
//!
//! ```text
//! Controller main loop (owns TaskTable, NvStore, park subsystem)
//!         ↓ init / wake / flash_rate / run(handle)
//! MountStatus (this crate)
//!   ├─ LedFlasher      off / on / blink at period/2 ticks
//!   ├─ general tick    parked-status mirror, 1 s
//!   ├─ Buzzer          startup melody, alerts
//!   └─ SoundPreference one persisted byte
//!         ↓
//! Platform HAL (GpioPort, ToneOutput, DelayNs, NvStore, TaskScheduler)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use embassy_time::Instant;
//! use mount_status::{MountStatus, ParkState, StatusConfig};
//! use platform::mocks::{MockFlash, MockGpio};
//! use platform::{NoTone, NvStore, TaskTable};
//!
//! let mut tasks = TaskTable::<8>::new();
//! let mut nv = NvStore::new(MockFlash::<256>::blank());
//! let mut status = MountStatus::new(StatusConfig::default(), MockGpio::new(), NoTone).unwrap();
//!
//! status.init(&mut tasks, &mut nv);
//! status.wake(&mut tasks);
//! status.flash_rate(&mut tasks, 500);
//! while let Some(handle) = tasks.poll(Instant::now()) {
//!     status.run(handle, ParkState::Unparked);
//! }
//! ```
//!
//! # Features
//!
//! - `defmt` - log through defmt (hardware builds)
//! - `tracing` - log through tracing (host builds)
//! - `std` - expose `platform::mocks` to integration tests

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
mod fmt;

pub mod buzzer;
pub mod config;
pub mod general;
pub mod led;
pub mod preference;
pub mod status;

pub use buzzer::{Buzzer, SoundStep};
pub use config::{
    BuzzerConfig, BuzzerKind, ConfigError, LedConfig, MelodyNote, ParkStatusConfig, StatusConfig,
};
pub use general::ParkState;
pub use led::{IndicatorMode, LedFlasher};
pub use preference::SoundPreference;
pub use status::{LifecycleState, MountStatus};
