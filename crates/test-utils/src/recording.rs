use std::sync::{Arc, Mutex};

use asyncdo::engine::{PollScheduler, ProcessDisplay};
use asyncdo::table::TrackedProcess;
use asyncdo::types::ProcessId;

/// One call made on a [`RecordingDisplay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCall {
    New(ProcessId),
    Updated {
        pid: ProcessId,
        lines: usize,
        finished: bool,
    },
}

/// Display that only remembers what it was told. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    calls: Arc<Mutex<Vec<DisplayCall>>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<DisplayCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn updates_for(&self, pid: ProcessId) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, DisplayCall::Updated { pid: p, .. } if *p == pid))
            .count()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl ProcessDisplay for RecordingDisplay {
    fn notify_new(&mut self, process: &TrackedProcess) {
        self.calls
            .lock()
            .unwrap()
            .push(DisplayCall::New(process.pid()));
    }

    fn notify_updated(&mut self, process: &TrackedProcess) {
        self.calls.lock().unwrap().push(DisplayCall::Updated {
            pid: process.pid(),
            lines: process.output().len(),
            finished: process.has_finished(),
        });
    }
}

/// One call made on a [`RecordingScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerCall {
    Enable,
    Disable,
    Rearm,
}

/// Poll scheduler that records enable/disable/rearm. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingScheduler {
    calls: Arc<Mutex<Vec<SchedulerCall>>>,
}

impl RecordingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<SchedulerCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: SchedulerCall) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }

    /// Enabled after the last enable/disable call.
    pub fn is_enabled(&self) -> bool {
        self.calls()
            .iter()
            .rev()
            .find_map(|c| match c {
                SchedulerCall::Enable => Some(true),
                SchedulerCall::Disable => Some(false),
                SchedulerCall::Rearm => None,
            })
            .unwrap_or(false)
    }
}

impl PollScheduler for RecordingScheduler {
    fn enable(&mut self) {
        self.calls.lock().unwrap().push(SchedulerCall::Enable);
    }

    fn disable(&mut self) {
        self.calls.lock().unwrap().push(SchedulerCall::Disable);
    }

    fn rearm(&mut self) {
        self.calls.lock().unwrap().push(SchedulerCall::Rearm);
    }
}
