// src/exec/event.rs

use crate::types::{ProcessId, Stream};

/// Events flowing from reader workers to the controller.
///
/// Per process the order is: zero or more `Output` events, then exactly one
/// `Completion`. Nothing is ever emitted for a pid after its `Completion`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    /// One line read from stdout or stderr, without its line terminator.
    Output {
        pid: ProcessId,
        stream: Stream,
        line: String,
    },
    /// The process has been reaped.
    Completion { pid: ProcessId, exit_code: i32 },
}

impl ProcessEvent {
    pub fn pid(&self) -> ProcessId {
        match self {
            ProcessEvent::Output { pid, .. } => *pid,
            ProcessEvent::Completion { pid, .. } => *pid,
        }
    }

    pub fn is_completion(&self) -> bool {
        matches!(self, ProcessEvent::Completion { .. })
    }
}
