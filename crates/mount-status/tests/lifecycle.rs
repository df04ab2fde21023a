//! Init / wake lifecycle and task registration
//!
//! Covers the one-shot guards, task naming, shared status-LED pins and what
//! happens when the scheduler refuses a registration.

// Test files use unwrap() for readable assertions.
#![allow(clippy::unwrap_used)]
#![allow(clippy::arithmetic_side_effects)]

mod common;

use common::{blank_nv, led_and_park_config, started, Clock, LED_PIN, PARK_PIN, STATUS_LED_PIN};
use embassy_time::Duration;
use mount_status::config::{GENERAL_TASK_NAME, LED_TASK_NAME, STATUS_LED_TASK_NAME, TASK_PRIORITY};
use mount_status::{BuzzerKind, LifecycleState, MountStatus, ParkState, StatusConfig};
use platform::mocks::MockGpio;
use platform::{NoTone, PinState, Priority, TaskScheduler, TaskTable};

#[test]
fn test_init_registers_general_task_once() {
    let mut tasks = TaskTable::<8>::new();
    let mut nv = blank_nv();
    let mut status = MountStatus::new(led_and_park_config(), MockGpio::new(), NoTone).unwrap();

    assert_eq!(status.lifecycle(), LifecycleState::default());
    status.init(&mut tasks, &mut nv);
    status.init(&mut tasks, &mut nv);

    assert_eq!(
        status.lifecycle(),
        LifecycleState {
            initialized: true,
            awake: false,
        }
    );
    assert!(status.is_initialized());
    assert!(!status.is_awake());
    assert_eq!(tasks.len(), 1);
    let handle = tasks.handle_by_name(GENERAL_TASK_NAME).unwrap();
    assert_eq!(status.general_task(), Some(handle));
    assert_eq!(tasks.period(handle), Some(Duration::from_millis(1000)));
    assert_eq!(tasks.priority(handle), Some(Priority(4)));
    assert!(status.gpio().is_output(PARK_PIN));
}

#[test]
fn test_wake_twice_registers_led_task_once() {
    let mut tasks = TaskTable::<8>::new();
    let mut nv = blank_nv();
    let mut status = started(led_and_park_config(), &mut tasks, &mut nv);
    status.wake(&mut tasks);

    assert!(status.is_awake());
    assert_eq!(tasks.len(), 2);
    let handle = tasks.handle_by_name(LED_TASK_NAME).unwrap();
    assert_eq!(status.led_task(), Some(handle));
    assert_eq!(tasks.priority(handle), Some(TASK_PRIORITY));
    assert_eq!(tasks.period(handle), Some(Duration::from_millis(500)));
    assert!(status.gpio().is_output(LED_PIN));
}

#[test]
fn test_wake_adopts_existing_led_task() {
    let mut tasks = TaskTable::<8>::new();
    let existing = tasks
        .add(Duration::from_millis(0), TASK_PRIORITY, LED_TASK_NAME)
        .unwrap();
    let mut nv = blank_nv();
    let status = started(led_and_park_config(), &mut tasks, &mut nv);

    assert_eq!(status.led_task(), Some(existing));
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks.period(existing), Some(Duration::from_millis(500)));
}

#[test]
fn test_flash_rate_before_wake_applies_at_wake() {
    let mut tasks = TaskTable::<8>::new();
    let mut nv = blank_nv();
    let mut status = MountStatus::new(led_and_park_config(), MockGpio::new(), NoTone).unwrap();
    status.init(&mut tasks, &mut nv);

    status.flash_rate(&mut tasks, 200);
    assert!(tasks.handle_by_name(LED_TASK_NAME).is_none());

    status.wake(&mut tasks);
    let handle = status.led_task().unwrap();
    assert_eq!(tasks.period(handle), Some(Duration::from_millis(100)));
}

#[test]
fn test_wake_takes_over_shared_status_led() {
    let mut tasks = TaskTable::<8>::new();
    tasks
        .add(Duration::from_millis(250), Priority(3), STATUS_LED_TASK_NAME)
        .unwrap();
    let config = StatusConfig {
        status_led_pin: Some(LED_PIN),
        ..led_and_park_config()
    };
    let mut nv = blank_nv();
    let _status = started(config, &mut tasks, &mut nv);

    assert!(tasks.handle_by_name(STATUS_LED_TASK_NAME).is_none());
    assert!(tasks.handle_by_name(LED_TASK_NAME).is_some());
}

#[test]
fn test_wake_takes_over_status_led_shared_with_buzzer() {
    let mut tasks = TaskTable::<8>::new();
    tasks
        .add(Duration::from_millis(250), Priority(3), STATUS_LED_TASK_NAME)
        .unwrap();
    let mut config = StatusConfig {
        led: None,
        status_led_pin: Some(STATUS_LED_PIN),
        ..led_and_park_config()
    };
    config.buzzer.kind = BuzzerKind::Frequency {
        pin: STATUS_LED_PIN,
    };
    let mut nv = blank_nv();
    let status = started(config, &mut tasks, &mut nv);

    assert!(tasks.handle_by_name(STATUS_LED_TASK_NAME).is_none());
    assert!(tasks.handle_by_name(LED_TASK_NAME).is_none());
    assert!(status.gpio().is_output(STATUS_LED_PIN));
    assert_eq!(tasks.len(), 1, "only the general status task remains");
}

#[test]
fn test_wake_leaves_separate_status_led_alone() {
    let mut tasks = TaskTable::<8>::new();
    tasks
        .add(Duration::from_millis(250), Priority(3), STATUS_LED_TASK_NAME)
        .unwrap();
    let config = StatusConfig {
        status_led_pin: Some(STATUS_LED_PIN),
        ..led_and_park_config()
    };
    let mut nv = blank_nv();
    let _status = started(config, &mut tasks, &mut nv);

    assert!(tasks.handle_by_name(STATUS_LED_TASK_NAME).is_some());
    assert_eq!(tasks.len(), 3);
}

#[test]
fn test_without_led_flash_rate_is_a_no_op() {
    let mut tasks = TaskTable::<8>::new();
    let mut nv = blank_nv();
    let config = StatusConfig {
        led: None,
        ..led_and_park_config()
    };
    let mut status = started(config, &mut tasks, &mut nv);
    status.flash_rate(&mut tasks, 1);

    assert_eq!(status.led_mode(), None);
    assert_eq!(status.led_task(), None);
    assert!(tasks.handle_by_name(LED_TASK_NAME).is_none());
    assert!(status.is_awake());
}

#[test]
fn test_refused_general_task_leaves_feature_inactive() {
    let mut tasks = TaskTable::<1>::new();
    tasks
        .add(Duration::from_millis(10), Priority(0), "Motion")
        .unwrap();
    let mut nv = blank_nv();
    let mut status = MountStatus::new(led_and_park_config(), MockGpio::new(), NoTone).unwrap();

    status.init(&mut tasks, &mut nv);
    status.wake(&mut tasks);

    assert!(status.is_initialized());
    assert!(status.is_awake());
    assert_eq!(status.general_task(), None);
    assert_eq!(status.led_task(), None);
    assert_eq!(tasks.len(), 1);

    // The only task left belongs to someone else.
    let handle = tasks.handle_by_name("Motion").unwrap();
    assert!(!status.run(handle, ParkState::Parked));
    assert_eq!(status.gpio().level(PARK_PIN), None);
}

#[test]
fn test_refused_led_task_keeps_general_task() {
    let mut tasks = TaskTable::<1>::new();
    let mut nv = blank_nv();
    let mut status = MountStatus::new(led_and_park_config(), MockGpio::new(), NoTone).unwrap();
    status.init(&mut tasks, &mut nv);
    status.wake(&mut tasks);
    status.flash_rate(&mut tasks, 100);

    assert!(status.general_task().is_some());
    assert_eq!(status.led_task(), None);

    let handle = status.general_task().unwrap();
    assert!(status.run(handle, ParkState::Parked));
    assert_eq!(status.gpio().level(PARK_PIN), Some(PinState::High));
    assert_eq!(status.gpio().level(LED_PIN), None);
}

#[test]
fn test_run_ignores_foreign_handles() {
    let mut tasks = TaskTable::<8>::new();
    let foreign = tasks
        .add(Duration::from_millis(5), Priority(1), "Focus")
        .unwrap();
    let mut nv = blank_nv();
    let mut status = started(led_and_park_config(), &mut tasks, &mut nv);

    assert!(!status.run(foreign, ParkState::Unparked));
}

#[test]
fn test_parked_output_follows_park_state_within_one_second() {
    let mut tasks = TaskTable::<8>::new();
    let mut nv = blank_nv();
    let mut status = started(led_and_park_config(), &mut tasks, &mut nv);
    let mut clock = Clock::new();

    clock.run(&mut tasks, &mut status, ParkState::Unparked, 1200, |_, _| {});
    assert_eq!(status.gpio().level(PARK_PIN), Some(PinState::Low));

    clock.run(&mut tasks, &mut status, ParkState::Parked, 1000, |_, _| {});
    assert_eq!(status.gpio().level(PARK_PIN), Some(PinState::High));

    clock.run(&mut tasks, &mut status, ParkState::Parking, 1000, |_, _| {});
    assert_eq!(status.gpio().level(PARK_PIN), Some(PinState::Low));
}
