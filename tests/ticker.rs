// tests/ticker.rs

mod common;
use crate::common::init_tracing;

use std::time::{Duration, Instant};

use asyncdo::config::parse_duration;
use asyncdo::engine::ticker::MAX_TICK;
use asyncdo::engine::{ExecutionController, PollScheduler, TickScheduler};
use asyncdo_test_utils::builders::EventScript;
use asyncdo_test_utils::fake_backend::FakeBackend;
use asyncdo_test_utils::recording::RecordingDisplay;

const TICK: Duration = Duration::from_millis(100);

#[test]
fn new_scheduler_is_disabled() {
    let mut ticker = TickScheduler::new(TICK);
    assert!(!ticker.is_enabled());
    assert_eq!(ticker.time_until_due(Instant::now()), None);
    assert!(!ticker.fire(Instant::now() + TICK * 10));
}

#[test]
fn fires_once_per_tick_while_enabled() {
    let mut ticker = TickScheduler::new(TICK);
    ticker.enable();
    let start = Instant::now();

    assert!(ticker.is_enabled());
    assert!(!ticker.fire(start));
    assert!(ticker.time_until_due(start).is_some_and(|d| d <= TICK));

    let later = start + TICK * 2;
    assert!(ticker.fire(later));
    assert!(!ticker.fire(later));
    assert_eq!(ticker.time_until_due(later), Some(TICK));
    assert!(ticker.fire(later + TICK));
}

#[test]
fn enable_twice_keeps_the_pending_trigger() {
    let mut ticker = TickScheduler::new(TICK);
    ticker.enable();
    let due = ticker.time_until_due(Instant::now());
    std::thread::sleep(Duration::from_millis(5));
    ticker.enable();
    assert!(ticker.time_until_due(Instant::now()) < due);
}

#[test]
fn disable_and_rearm() {
    let mut ticker = TickScheduler::new(TICK);

    ticker.rearm();
    assert!(!ticker.is_enabled());
    assert_eq!(ticker.rearms(), 0);

    ticker.enable();
    ticker.rearm();
    ticker.rearm();
    assert_eq!(ticker.rearms(), 2);

    ticker.disable();
    assert!(!ticker.is_enabled());
    assert!(!ticker.fire(Instant::now() + TICK * 10));
}

#[test]
fn controller_turns_ticker_off_when_done() {
    init_tracing();
    let (backend, handle) = FakeBackend::new();
    let mut controller = ExecutionController::new(
        backend,
        RecordingDisplay::new(),
        TickScheduler::new(TICK),
        Duration::ZERO,
    );

    let pid = controller.execute("a").expect("execute");
    assert!(controller.scheduler().is_enabled());

    controller.check_now();
    assert!(controller.scheduler().rearms() >= 2);

    handle.push(EventScript::for_pid(pid).exit(0));
    controller.check_now();
    assert!(!controller.scheduler().is_enabled());
}

#[test]
fn huge_tick_is_clamped_and_never_overflows() {
    let tick = parse_duration("18446744073709551615s").unwrap();
    let mut ticker = TickScheduler::new(tick);
    assert_eq!(ticker.tick(), MAX_TICK);

    ticker.enable();
    ticker.rearm();
    let now = Instant::now();
    assert!(ticker.time_until_due(now).is_some_and(|d| d <= MAX_TICK));
    assert!(!ticker.fire(now));
    assert!(ticker.fire(now + MAX_TICK));
}
