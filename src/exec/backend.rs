// src/exec/backend.rs

//! Pluggable process backend abstraction.
//!
//! The controller talks to a `ProcessBackend` instead of a concrete
//! [`ProcessPool`]. Production code uses the pool; tests can provide a fake
//! that hands out made-up pids and emits scripted events without touching
//! the OS.

use crate::errors::Result;
use crate::exec::{ProcessEvent, ProcessPool};
use crate::table::signal;
use crate::types::ProcessId;

/// Everything the controller needs from the execution layer.
pub trait ProcessBackend {
    /// Start `command` and return its id without waiting for any output.
    fn spawn(&mut self, command: &str) -> Result<ProcessId>;

    /// Remove and return every event queued since the previous call.
    fn drain(&mut self) -> Vec<ProcessEvent>;

    /// True while any reader is still active.
    fn any_running(&mut self) -> bool;

    /// Ask a process to terminate. Delivery is advisory: the process still
    /// reports a normal `Completion` once it is gone.
    fn terminate(&mut self, pid: ProcessId) -> Result<()>;

    /// Best-effort, bounded shutdown of the readers.
    fn stop(&mut self);
}

impl ProcessBackend for ProcessPool {
    fn spawn(&mut self, command: &str) -> Result<ProcessId> {
        ProcessPool::spawn(self, command)
    }

    fn drain(&mut self) -> Vec<ProcessEvent> {
        ProcessPool::drain(self)
    }

    fn any_running(&mut self) -> bool {
        ProcessPool::any_running(self)
    }

    fn terminate(&mut self, pid: ProcessId) -> Result<()> {
        signal::terminate(pid)
    }

    fn stop(&mut self) {
        ProcessPool::stop(self)
    }
}
