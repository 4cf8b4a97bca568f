// src/render/terminal.rs

use std::collections::HashMap;
use std::io::Write;

use tracing::warn;

use crate::engine::ProcessDisplay;
use crate::render::DisplayOptions;
use crate::render::format::{command_list_row, output_line, process_header};
use crate::table::TrackedProcess;
use crate::types::ProcessId;

/// Streams process output to a writer as plain text.
///
/// Every output line is prefixed with `[pid]` so that several commands can
/// share one terminal. Only lines that were not written before are printed
/// on each update.
#[derive(Debug)]
pub struct TerminalDisplay<W: Write> {
    out: W,
    options: DisplayOptions,
    written: HashMap<ProcessId, usize>,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, options: DisplayOptions) -> Self {
        Self {
            out,
            options,
            written: HashMap::new(),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_lines(&mut self, lines: &[String]) {
        let result = lines
            .iter()
            .try_for_each(|line| writeln!(self.out, "{line}"))
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            warn!(error = %e, "failed to write process output");
        }
    }
}

impl<W: Write> ProcessDisplay for TerminalDisplay<W> {
    fn notify_new(&mut self, process: &TrackedProcess) {
        self.written.insert(process.pid(), 0);
        let row = command_list_row(process, self.options.command_width);
        self.write_lines(&[row]);
    }

    fn notify_updated(&mut self, process: &TrackedProcess) {
        let pid = process.pid();
        let offset = self.written.get(&pid).copied().unwrap_or(0);
        let fresh = process.output().from_offset(offset);

        let mut lines: Vec<String> = fresh
            .iter()
            .map(|l| format!("[{pid}] {}", output_line(l, &self.options.stderr_prefix)))
            .collect();
        self.written.insert(pid, offset + fresh.len());

        if process.has_finished() {
            lines.extend(process_header(process));
        }

        if !lines.is_empty() {
            self.write_lines(&lines);
        }
    }
}
