// tests/controller_real.rs
#![cfg(unix)]

mod common;
use crate::common::{init_tracing, real_pool, wait_until, LIMIT};

use std::time::{Duration, Instant};

use asyncdo::engine::{ExecutionController, TickScheduler};
use asyncdo::exec::ProcessPool;
use asyncdo::render::{DisplayOptions, TerminalDisplay};
use asyncdo::table::ProcessStatus;
use asyncdo::types::Stream;
use asyncdo_test_utils::recording::{
    DisplayCall, RecordingDisplay, RecordingScheduler, SchedulerCall,
};

type Controller = ExecutionController<ProcessPool, RecordingDisplay, RecordingScheduler>;

fn controller() -> (Controller, RecordingDisplay, RecordingScheduler) {
    init_tracing();
    let display = RecordingDisplay::new();
    let scheduler = RecordingScheduler::new();
    let controller = ExecutionController::new(
        real_pool(),
        display.clone(),
        scheduler.clone(),
        Duration::ZERO,
    );
    (controller, display, scheduler)
}

/// Keep checking until nothing runs any more. Panics after [`LIMIT`].
fn check_until_done(controller: &mut Controller) {
    let done = wait_until(LIMIT, || controller.check_now().all_finished);
    assert!(done, "commands did not finish in time");
}

#[test]
fn echo_hello_is_captured_and_polling_stops() {
    let (mut controller, display, scheduler) = controller();

    let pid = controller.execute("echo hello").expect("execute");
    check_until_done(&mut controller);

    let process = controller.process(pid).expect("tracked");
    assert_eq!(process.output().stream(Stream::Stdout).collect::<Vec<_>>(), vec!["hello"]);
    assert_eq!(process.status(), ProcessStatus::Exited(0));
    assert!(process.completion_time().is_some());

    assert!(!controller.is_polling());
    assert_eq!(scheduler.calls().first(), Some(&SchedulerCall::Enable));
    assert_eq!(scheduler.calls().last(), Some(&SchedulerCall::Disable));
    assert_eq!(display.calls().first(), Some(&DisplayCall::New(pid)));
    assert!(matches!(
        display.calls().last(),
        Some(DisplayCall::Updated { finished: true, .. })
    ));
}

#[test]
fn failing_command_reports_its_exit_code_and_stderr() {
    let (mut controller, _display, _scheduler) = controller();

    let pid = controller
        .execute("echo out; echo err 1>&2; exit 3")
        .expect("execute");
    check_until_done(&mut controller);

    let process = controller.process(pid).expect("tracked");
    assert_eq!(process.exit_code(), Some(3));
    assert_eq!(process.output().stream(Stream::Stdout).collect::<Vec<_>>(), vec!["out"]);
    assert_eq!(process.output().stream(Stream::Stderr).collect::<Vec<_>>(), vec!["err"]);
}

#[test]
fn concurrent_commands_finish_in_a_single_check() {
    let (mut controller, display, scheduler) = controller();

    let started = Instant::now();
    let a = controller.execute("sleep 1; echo a").expect("execute a");
    let b = controller.execute("sleep 1; echo b").expect("execute b");
    // Both were spawned without waiting for either to finish.
    assert!(started.elapsed() < Duration::from_millis(900));
    display.clear();

    let readers_done = wait_until(LIMIT, || !controller.backend_mut().any_running());
    assert!(readers_done);

    let report = controller.check_now();

    assert!(report.all_finished);
    let mut changed = report.changed.clone();
    changed.sort();
    let mut expected = vec![a, b];
    expected.sort();
    assert_eq!(changed, expected);
    assert_eq!(display.updates_for(a), 1);
    assert_eq!(display.updates_for(b), 1);
    assert!(!controller.is_polling());
    assert_eq!(scheduler.count(SchedulerCall::Disable), 1);
}

#[test]
fn killed_command_finishes_with_signal_exit_code() {
    let (mut controller, _display, _scheduler) = controller();

    let pid = controller.execute("sleep 30").expect("execute");
    assert!(controller.any_running());

    controller.kill(pid).expect("kill");
    check_until_done(&mut controller);

    assert_eq!(
        controller.process(pid).and_then(|p| p.exit_code()),
        Some(-libc::SIGTERM)
    );
}

#[test]
fn stop_terminates_everything() {
    let (mut controller, _display, _scheduler) = controller();

    controller.execute("sleep 30").expect("execute");
    controller.execute("sleep 30").expect("execute");

    let started = Instant::now();
    controller.stop();
    check_until_done(&mut controller);

    assert!(started.elapsed() < LIMIT);
    assert!(controller.processes().all(|p| p.exit_code() == Some(-libc::SIGTERM)));
}

#[test]
fn tick_loop_streams_output_to_terminal() {
    init_tracing();
    let tick = Duration::from_millis(20);
    let mut controller = ExecutionController::new(
        real_pool(),
        TerminalDisplay::new(Vec::new(), DisplayOptions::default()),
        TickScheduler::new(tick),
        Duration::from_millis(10),
    );

    let pid = controller
        .execute("echo hello; echo oops 1>&2")
        .expect("execute");

    let deadline = Instant::now() + LIMIT;
    while controller.scheduler().is_enabled() {
        assert!(Instant::now() < deadline, "tick loop did not finish");
        if controller.scheduler_mut().fire(Instant::now()) {
            controller.check();
        }
        std::thread::sleep(tick / 2);
    }

    let text = String::from_utf8_lossy(controller.display().get_ref()).into_owned();
    assert!(text.contains(&format!("[{pid}] hello")), "{text}");
    assert!(text.contains(&format!("[{pid}] E> oops")), "{text}");
    assert!(text.contains(" [command] echo hello; echo oops 1>&2"), "{text}");
    assert!(text.contains("  [status] Exited (0)"), "{text}");
}
