//! Record of one launched command.

use std::fmt;
use std::time::{Duration, Instant};

use crate::table::output::OutputLog;
use crate::types::{ProcessId, Stream};

/// Status of a tracked process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    Running,
    Exited(i32),
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessStatus::Running => write!(f, "Running"),
            ProcessStatus::Exited(code) => write!(f, "Exited ({code})"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Finished {
    exit_code: i32,
    at: Instant,
}

/// A spawned command and everything it printed.
///
/// Exit code and completion time are stored together, so a process is either
/// running with neither, or finished with both.
#[derive(Debug, Clone)]
pub struct TrackedProcess {
    pid: ProcessId,
    command: String,
    started_at: Instant,
    finished: Option<Finished>,
    output: OutputLog,
}

impl TrackedProcess {
    pub fn new(pid: ProcessId, command: impl Into<String>) -> Self {
        Self::with_start_time(pid, command, Instant::now())
    }

    pub fn with_start_time(
        pid: ProcessId,
        command: impl Into<String>,
        started_at: Instant,
    ) -> Self {
        Self {
            pid,
            command: command.into(),
            started_at,
            finished: None,
            output: OutputLog::new(),
        }
    }

    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn start_time(&self) -> Instant {
        self.started_at
    }

    pub fn completion_time(&self) -> Option<Instant> {
        self.finished.map(|f| f.at)
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.finished.map(|f| f.exit_code)
    }

    pub fn has_finished(&self) -> bool {
        self.finished.is_some()
    }

    pub fn status(&self) -> ProcessStatus {
        match self.finished {
            Some(f) => ProcessStatus::Exited(f.exit_code),
            None => ProcessStatus::Running,
        }
    }

    /// Start to completion once finished, start to now while running.
    pub fn elapsed(&self) -> Duration {
        match self.finished {
            Some(f) => f.at.saturating_duration_since(self.started_at),
            None => self.started_at.elapsed(),
        }
    }

    pub fn output(&self) -> &OutputLog {
        &self.output
    }

    pub(crate) fn append(&mut self, stream: Stream, line: String) {
        self.output.push(stream, line);
    }

    pub(crate) fn complete(&mut self, exit_code: i32, at: Instant) {
        self.finished = Some(Finished { exit_code, at });
    }
}
