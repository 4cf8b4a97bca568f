// tests/render.rs

use std::time::Duration;

use asyncdo::engine::ProcessDisplay;
use asyncdo::exec::ProcessEvent;
use asyncdo::render::format::{
    command_list_header, command_list_row, format_elapsed, output_line, process_header,
};
use asyncdo::render::{DisplayOptions, TerminalDisplay};
use asyncdo::table::{OutputLine, ProcessTable, TrackedProcess};
use asyncdo::types::{ProcessId, Stream};

fn output(pid: u32, stream: Stream, line: &str) -> ProcessEvent {
    ProcessEvent::Output {
        pid: ProcessId::new(pid),
        stream,
        line: line.to_string(),
    }
}

#[test]
fn elapsed_is_milliseconds_up_to_one_second() {
    assert_eq!(format_elapsed(Duration::ZERO), "0ms");
    assert_eq!(format_elapsed(Duration::from_millis(3)), "3ms");
    assert_eq!(format_elapsed(Duration::from_millis(999)), "999ms");
    assert_eq!(format_elapsed(Duration::from_millis(1000)), "1,000ms");
}

#[test]
fn elapsed_above_one_second_uses_trimmed_seconds() {
    assert_eq!(format_elapsed(Duration::from_millis(1500)), "1.5s");
    assert_eq!(format_elapsed(Duration::from_millis(2000)), "2s");
    assert_eq!(format_elapsed(Duration::from_millis(65_250)), "65.25s");
    assert_eq!(format_elapsed(Duration::from_millis(1_234_567)), "1,234.57s");
}

#[test]
fn header_lines_are_aligned_and_framed() {
    let mut table = ProcessTable::new();
    table.add("echo hello", ProcessId::new(4242)).expect("add");
    table.apply(ProcessEvent::Completion {
        pid: ProcessId::new(4242),
        exit_code: 0,
    });
    let process = table.get(ProcessId::new(4242)).expect("tracked");

    let lines = process_header(process);

    assert_eq!(lines.len(), 6);
    // Longest value is 10 chars ("echo hello" and "Exited (0)").
    let rule = "=".repeat(22);
    assert_eq!(lines[0], rule);
    assert_eq!(lines[1], " [command] echo hello");
    assert_eq!(lines[2], "  [status] Exited (0)");
    assert!(lines[3].starts_with("    [time] ") && lines[3].ends_with("ms"));
    assert_eq!(lines[4], "     [pid] 4242");
    assert_eq!(lines[5], rule);
}

#[test]
fn running_process_header_says_running() {
    let process = TrackedProcess::new(ProcessId::new(1), "sleep 5");
    let lines = process_header(&process);
    assert_eq!(lines[2], "  [status] Running");
}

#[test]
fn command_list_has_fixed_columns() {
    let header = command_list_header();
    assert_eq!(header.len(), 3);
    assert_eq!(header[0], "=".repeat(77));
    assert_eq!(header[2], header[0]);
    assert!(header[1].starts_with(" PID     | COMMAND"));
    assert!(header[1].ends_with("| STATUS"));

    let process = TrackedProcess::new(ProcessId::new(4242), "echo hello");
    let row = command_list_row(&process, 30);
    assert_eq!(row, format!(" 4242    | {:<51} | Running", "echo hello"));
    assert_eq!(row.find('|'), header[1].find('|'));
}

#[test]
fn long_commands_are_truncated_in_the_list() {
    let process = TrackedProcess::new(ProcessId::new(1), "a very long command line");

    let row = command_list_row(&process, 10);
    assert!(row.contains("| a very ... "), "{row}");

    let exact = TrackedProcess::new(ProcessId::new(1), "0123456789");
    assert!(command_list_row(&exact, 10).contains("| 0123456789 "));
}

#[test]
fn stderr_lines_get_the_prefix() {
    let out = OutputLine {
        stream: Stream::Stdout,
        text: "fine".into(),
    };
    let err = OutputLine {
        stream: Stream::Stderr,
        text: "broken".into(),
    };
    assert_eq!(output_line(&out, "E> "), "fine");
    assert_eq!(output_line(&err, "E> "), "E> broken");
    assert_eq!(output_line(&err, "!! "), "!! broken");
}

#[test]
fn terminal_display_writes_each_line_once() {
    let pid = ProcessId::new(7);
    let mut table = ProcessTable::new();
    let mut display = TerminalDisplay::new(Vec::new(), DisplayOptions::default());

    display.notify_new(table.add("make", pid).expect("add"));

    table.apply(output(7, Stream::Stdout, "hello"));
    table.apply(output(7, Stream::Stderr, "bad"));
    display.notify_updated(table.get(pid).expect("tracked"));

    table.apply(output(7, Stream::Stdout, "again"));
    display.notify_updated(table.get(pid).expect("tracked"));

    table.apply(ProcessEvent::Completion { pid, exit_code: 2 });
    display.notify_updated(table.get(pid).expect("tracked"));

    let text = String::from_utf8(display.into_inner()).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();

    assert!(lines[0].starts_with(" 7       | make"));
    assert_eq!(&lines[1..4], &["[7] hello", "[7] E> bad", "[7] again"]);
    assert_eq!(lines.len(), 4 + 6);
    assert_eq!(lines[5], " [command] make");
    assert_eq!(lines[6], "  [status] Exited (2)");
    assert_eq!(text.matches("hello").count(), 1);
}
