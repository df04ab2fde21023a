//! Status LED waveform under the cooperative scheduler
//!
//! Drives the LED task from a virtual millisecond clock and checks the level
//! of the LED line once per millisecond.

// Test files use unwrap() for readable assertions.
#![allow(clippy::unwrap_used)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]

mod common;

use common::{blank_nv, inner_run_lengths, led_and_park_config, started, Clock, LED_PIN};
use mount_status::{IndicatorMode, ParkState};
use platform::{PinState, TaskTable};
use proptest::prelude::*;

fn sample_levels(period_ms: u32, duration_ms: u64) -> Vec<PinState> {
    let mut tasks = TaskTable::new();
    let mut nv = blank_nv();
    let mut status = started(led_and_park_config(), &mut tasks, &mut nv);
    let mut clock = Clock::new();
    clock.run(&mut tasks, &mut status, ParkState::Unparked, 1500, |_, _| {});

    status.flash_rate(&mut tasks, period_ms);
    let mut levels = Vec::new();
    clock.run(&mut tasks, &mut status, ParkState::Unparked, duration_ms, |_, gpio| {
        levels.push(gpio.level(LED_PIN).unwrap());
    });
    levels
}

#[test]
fn test_default_heartbeat_toggles_every_500ms() {
    let mut tasks = TaskTable::new();
    let mut nv = blank_nv();
    let mut status = started(led_and_park_config(), &mut tasks, &mut nv);
    let mut levels = Vec::new();
    Clock::new().run(&mut tasks, &mut status, ParkState::Unparked, 3001, |_, gpio| {
        levels.push(gpio.level(LED_PIN).unwrap());
    });
    // First tick at t=0 writes off, then one flip every 500 ms.
    assert_eq!(levels[0], PinState::Low);
    assert_eq!(levels[499], PinState::Low);
    assert_eq!(levels[500], PinState::High);
    assert_eq!(levels[1000], PinState::Low);
    assert_eq!(inner_run_lengths(&levels), [500, 500, 500, 500, 500]);
}

#[test]
fn test_rate_zero_holds_led_off() {
    let levels = sample_levels(0, 5000);
    assert!(levels.iter().all(|l| *l == PinState::Low));
}

#[test]
fn test_rate_one_holds_led_on() {
    let levels = sample_levels(1, 5000);
    assert!(levels.iter().all(|l| *l == PinState::High));
}

#[test]
fn test_rate_change_applies_at_next_tick() {
    let mut tasks = TaskTable::new();
    let mut nv = blank_nv();
    let mut status = started(led_and_park_config(), &mut tasks, &mut nv);
    let mut clock = Clock::new();
    clock.run(&mut tasks, &mut status, ParkState::Unparked, 10, |_, _| {});

    status.flash_rate(&mut tasks, 1);
    clock.run(&mut tasks, &mut status, ParkState::Unparked, 1, |_, gpio| {
        assert_eq!(gpio.level(LED_PIN), Some(PinState::High));
    });
    assert_eq!(status.led_mode(), Some(IndicatorMode::On));
}

#[test]
fn test_active_low_led_is_inverted() {
    let mut config = led_and_park_config();
    if let Some(led) = config.led.as_mut() {
        led.on_level = platform::OnLevel::Low;
    }
    let mut tasks = TaskTable::new();
    let mut nv = blank_nv();
    let mut status = started(config, &mut tasks, &mut nv);
    status.flash_rate(&mut tasks, 1);
    Clock::new().run(&mut tasks, &mut status, ParkState::Unparked, 600, |_, gpio| {
        assert_eq!(gpio.level(LED_PIN), Some(PinState::Low));
    });
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Blinking spends `period / 2` ms at each level, so one full cycle is
    /// within a millisecond of the requested period with a 50 % duty cycle.
    #[test]
    fn prop_blink_has_half_period_phases(period in 2u32..=1200) {
        let half = (period / 2) as usize;
        let levels = sample_levels(period, u64::from(period / 2) * 8 + 2);
        let runs = inner_run_lengths(&levels);
        prop_assert!(runs.len() >= 4, "too few transitions: {}", runs.len());
        for len in &runs {
            prop_assert_eq!(*len, half);
        }
        let cycle = runs[0] + runs[1];
        prop_assert!(cycle.abs_diff(period as usize) <= 1);
    }

    #[test]
    fn prop_rate_decoding_matches_mode(period in any::<u32>()) {
        let mode = IndicatorMode::from_period(period);
        match period {
            0 => {
                prop_assert_eq!(mode, IndicatorMode::Off);
            }
            1 => {
                prop_assert_eq!(mode, IndicatorMode::On);
            }
            n => {
                prop_assert!(matches!(mode, IndicatorMode::Blinking(p) if p.get() == n));
            }
        }
    }
}
