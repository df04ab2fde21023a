//! Mock implementations for testing
//!
//! This module provides mock implementations of the platform traits for use
//! in unit and integration tests. Integration tests of dependent crates
//! enable it through the `std` feature.

#![cfg(any(test, feature = "std"))]
#![allow(clippy::arithmetic_side_effects)] // Mock counters; overflow not a concern in tests

use core::cell::RefCell;

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;
use embedded_storage::{ReadStorage, Storage};

use crate::gpio::{GpioPort, PinId, PinState};
use crate::tone::ToneOutput;

const MAX_PINS: usize = 16;
const MAX_WRITES: usize = 256;
const MAX_SOUND_EVENTS: usize = 64;

/// Error injected by failing mocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockFailure;

// ── GPIO ─────────────────────────────────────────────────────────────────────

/// Mock GPIO port: tracks pin modes, levels and write history.
pub struct MockGpio {
    outputs: heapless::Vec<PinId, MAX_PINS>,
    levels: heapless::Vec<(PinId, PinState), MAX_PINS>,
    history: heapless::Vec<(PinId, PinState), MAX_WRITES>,
    writes: usize,
    failing: bool,
}

impl MockGpio {
    /// Create a port with every pin unconfigured and undriven.
    pub fn new() -> Self {
        Self {
            outputs: heapless::Vec::new(),
            levels: heapless::Vec::new(),
            history: heapless::Vec::new(),
            writes: 0,
            failing: false,
        }
    }

    /// Make every subsequent call fail.
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// `true` once `pin` has been configured as an output.
    pub fn is_output(&self, pin: PinId) -> bool {
        self.outputs.contains(&pin)
    }

    /// Last level written to `pin`, if any.
    pub fn level(&self, pin: PinId) -> Option<PinState> {
        self.levels
            .iter()
            .find(|(p, _)| *p == pin)
            .map(|(_, state)| *state)
    }

    /// Levels written to `pin`, oldest first (first 256 writes of the port).
    pub fn history(&self, pin: PinId) -> impl Iterator<Item = PinState> + '_ {
        self.history
            .iter()
            .filter(move |(p, _)| *p == pin)
            .map(|(_, state)| *state)
    }

    /// Total successful writes across all pins.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl Default for MockGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioPort for MockGpio {
    type Error = MockFailure;

    fn set_output(&mut self, pin: PinId) -> Result<(), Self::Error> {
        if self.failing {
            return Err(MockFailure);
        }
        if !self.outputs.contains(&pin) {
            self.outputs.push(pin).map_err(|_| MockFailure)?;
        }
        Ok(())
    }

    fn write(&mut self, pin: PinId, state: PinState) -> Result<(), Self::Error> {
        if self.failing {
            return Err(MockFailure);
        }
        match self.levels.iter_mut().find(|(p, _)| *p == pin) {
            Some(entry) => entry.1 = state,
            None => self.levels.push((pin, state)).map_err(|_| MockFailure)?,
        }
        // Store writes for verification
        if self.history.len() < self.history.capacity() {
            let _ = self.history.push((pin, state));
        }
        self.writes += 1;
        Ok(())
    }
}

// ── Non-volatile storage ─────────────────────────────────────────────────────

/// Mock byte-addressable non-volatile device of `N` bytes.
///
/// Starts erased (all `0xFF`), like a fresh EEPROM.
#[derive(Clone)]
pub struct MockFlash<const N: usize> {
    bytes: [u8; N],
    writes: usize,
    failing: bool,
}

impl<const N: usize> MockFlash<N> {
    /// Create an erased device.
    pub fn blank() -> Self {
        Self {
            bytes: [0xFF; N],
            writes: 0,
            failing: false,
        }
    }

    /// Make every subsequent access fail.
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// Raw byte at `offset` (including the key header).
    pub fn byte(&self, offset: usize) -> Option<u8> {
        self.bytes.get(offset).copied()
    }

    /// Number of write operations performed.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    fn range(offset: u32, len: usize) -> Option<core::ops::Range<usize>> {
        let start = usize::try_from(offset).ok()?;
        let end = start.checked_add(len)?;
        (end <= N).then_some(start..end)
    }
}

impl<const N: usize> ReadStorage for MockFlash<N> {
    type Error = MockFailure;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        if self.failing {
            return Err(MockFailure);
        }
        let range = Self::range(offset, bytes.len()).ok_or(MockFailure)?;
        let src = self.bytes.get(range).ok_or(MockFailure)?;
        bytes.copy_from_slice(src);
        Ok(())
    }

    fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Storage for MockFlash<N> {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.failing {
            return Err(MockFailure);
        }
        let range = Self::range(offset, bytes.len()).ok_or(MockFailure)?;
        let dst = self.bytes.get_mut(range).ok_or(MockFailure)?;
        dst.copy_from_slice(bytes);
        self.writes += 1;
        Ok(())
    }
}

// ── Sound timeline ───────────────────────────────────────────────────────────

/// One observable buzzer action, stamped with the virtual time it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEvent {
    /// `tone(frequency_hz, duration)` started at `at_ms`
    Tone {
        /// Virtual time in milliseconds
        at_ms: u64,
        /// Requested frequency
        frequency_hz: u32,
        /// Requested duration in milliseconds
        duration_ms: u64,
    },
    /// `no_tone()` at `at_ms`
    Silence {
        /// Virtual time in milliseconds
        at_ms: u64,
    },
}

struct TimelineState {
    now_ns: u64,
    events: heapless::Vec<SoundEvent, MAX_SOUND_EVENTS>,
    delays_ms: heapless::Vec<u64, MAX_SOUND_EVENTS>,
}

/// Virtual clock shared by [`MockTone`] and [`MockDelay`].
///
/// Delays advance the clock; tone calls are recorded at the current time.
pub struct Timeline {
    state: RefCell<TimelineState>,
}

impl Timeline {
    /// Start a timeline at t = 0 with no events.
    pub fn new() -> Self {
        Self {
            state: RefCell::new(TimelineState {
                now_ns: 0,
                events: heapless::Vec::new(),
                delays_ms: heapless::Vec::new(),
            }),
        }
    }

    /// Virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.state.borrow().now_ns / 1_000_000
    }

    /// Recorded tone/silence events, oldest first.
    pub fn events(&self) -> heapless::Vec<SoundEvent, MAX_SOUND_EVENTS> {
        self.state.borrow().events.clone()
    }

    /// Recorded delays in milliseconds, oldest first.
    pub fn delays_ms(&self) -> heapless::Vec<u64, MAX_SOUND_EVENTS> {
        self.state.borrow().delays_ms.clone()
    }

    fn record(&self, event: SoundEvent) {
        let _ = self.state.borrow_mut().events.push(event);
    }

    fn advance_ns(&self, ns: u64) {
        let mut state = self.state.borrow_mut();
        state.now_ns = state.now_ns.saturating_add(ns);
        let _ = state.delays_ms.push(ns / 1_000_000);
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Mock frequency-capable buzzer recording onto a [`Timeline`].
pub struct MockTone<'a> {
    timeline: &'a Timeline,
}

impl<'a> MockTone<'a> {
    /// Create a tone output that records onto `timeline`.
    pub fn new(timeline: &'a Timeline) -> Self {
        Self { timeline }
    }
}

impl ToneOutput for MockTone<'_> {
    type Error = core::convert::Infallible;

    fn tone(&mut self, frequency_hz: u32, duration: Duration) -> Result<(), Self::Error> {
        self.timeline.record(SoundEvent::Tone {
            at_ms: self.timeline.now_ms(),
            frequency_hz,
            duration_ms: duration.as_millis(),
        });
        Ok(())
    }

    fn no_tone(&mut self) -> Result<(), Self::Error> {
        self.timeline.record(SoundEvent::Silence {
            at_ms: self.timeline.now_ms(),
        });
        Ok(())
    }
}

/// Mock blocking delay that advances a [`Timeline`] instead of sleeping.
pub struct MockDelay<'a> {
    timeline: &'a Timeline,
}

impl<'a> MockDelay<'a> {
    /// Create a delay that advances `timeline`.
    pub fn new(timeline: &'a Timeline) -> Self {
        Self { timeline }
    }
}

impl DelayNs for MockDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.timeline.advance_ns(u64::from(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.timeline.advance_ns(u64::from(us) * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.timeline.advance_ns(u64::from(ms) * 1_000_000);
    }
}
