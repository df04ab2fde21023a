//! Hardware Abstraction Layer (HAL) for the mount controller
//!
//! This crate provides trait-based abstractions for the hardware and
//! runtime services the mount status subsystem talks to, enabling
//! development and testing without physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (controller main loop)
//!         ↓
//! Feature Layers (mount-status)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (Embassy HAL + PAC)
//! ```
//!
//! # Abstractions
//!
//! - [`gpio`] - Digital pins addressed by number, with output polarity
//! - [`tone`] - Frequency-capable buzzer output
//! - [`storage`] - Keyed non-volatile store over `embedded-storage`
//! - [`scheduler`] - Cooperative periodic task scheduler
//!
//! # Features
//!
//! - `std`: Expose [`mocks`] to integration tests of dependent crates
//! - `defmt`: Enable defmt logging derives

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod gpio;
pub mod mocks;
pub mod scheduler;
pub mod storage;
pub mod tone;

pub use gpio::{GpioPort, OnLevel, PinId, PinState};
pub use scheduler::{Priority, SchedulerError, TaskHandle, TaskScheduler, TaskTable};
pub use storage::{NvError, NvStore};
pub use tone::{NoTone, ToneOutput};
