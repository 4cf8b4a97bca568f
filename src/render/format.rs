// src/render/format.rs

//! Plain-text formatting of processes.

use std::time::Duration;

use crate::table::{OutputLine, TrackedProcess};

const COMMAND_LIST_RULE: &str =
    "=============================================================================";

/// `"250ms"` up to one second, then seconds with at most two decimals
/// (`"1.5s"`, `"1,234.57s"`).
pub fn format_elapsed(elapsed: Duration) -> String {
    let ms = elapsed.as_millis();
    if ms <= 1000 {
        return format!("{}ms", group_thousands(&ms.to_string()));
    }

    let secs = format!("{:.2}", elapsed.as_secs_f64());
    let secs = secs.trim_end_matches('0').trim_end_matches('.');
    format!("{}s", group_thousands(secs))
}

/// Insert `,` every three digits of the integer part of a decimal number.
fn group_thousands(number: &str) -> String {
    let (int_part, frac_part) = match number.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (number, None),
    };

    let mut grouped = String::with_capacity(number.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// Banner describing one process:
///
/// ```text
/// ======================
///  [command] echo hello
///   [status] Exited (0)
///     [time] 3ms
///      [pid] 4242
/// ======================
/// ```
pub fn process_header(process: &TrackedProcess) -> Vec<String> {
    let command = process.command().to_string();
    let status = process.status().to_string();
    let time = format_elapsed(process.elapsed());
    let pid = process.pid().to_string();

    let width = [&command, &status, &time, &pid]
        .iter()
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(0)
        + 12;
    let rule = "=".repeat(width);

    vec![
        rule.clone(),
        format!(" [command] {command}"),
        format!("  [status] {status}"),
        format!("    [time] {time}"),
        format!("     [pid] {pid}"),
        rule,
    ]
}

pub fn command_list_header() -> Vec<String> {
    vec![
        COMMAND_LIST_RULE.to_string(),
        " PID     | COMMAND                                             | STATUS".to_string(),
        COMMAND_LIST_RULE.to_string(),
    ]
}

/// One row of the command list. Commands longer than `width` characters are
/// cut to `width - 3` and end in `...`.
pub fn command_list_row(process: &TrackedProcess, width: usize) -> String {
    let command = truncate(process.command(), width);
    format!(
        " {:<7} | {:<51} | {}",
        process.pid().to_string(),
        command,
        process.status()
    )
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

/// A line of output as shown to the user; stderr gets `stderr_prefix`.
pub fn output_line(line: &OutputLine, stderr_prefix: &str) -> String {
    if line.stream.is_stderr() {
        format!("{stderr_prefix}{}", line.text)
    } else {
        line.text.clone()
    }
}
