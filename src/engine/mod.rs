// src/engine/mod.rs

//! Orchestration engine for asyncdo.
//!
//! The [`ExecutionController`] is the only thing a front end talks to. It
//! forwards spawn requests to a [`ProcessBackend`](crate::exec::ProcessBackend),
//! applies drained events to the [`ProcessTable`](crate::table::ProcessTable)
//! and tells two host-provided collaborators what happened:
//!
//! - a [`ProcessDisplay`] that renders processes and their output
//! - a [`PollScheduler`] that calls back into `check()` periodically
//!
//! [`ticker`] contains a simple scheduler for hosts that poll in a loop.

use crate::table::TrackedProcess;
use crate::types::ProcessId;

/// Receives process changes for rendering.
pub trait ProcessDisplay {
    /// A process has just been spawned and added to the table.
    fn notify_new(&mut self, process: &TrackedProcess);

    /// A process got new output or finished. Called at most once per process
    /// per check.
    fn notify_updated(&mut self, process: &TrackedProcess);
}

/// The host's "call me periodically" mechanism.
pub trait PollScheduler {
    /// Start firing periodic triggers.
    fn enable(&mut self);

    /// Stop firing triggers; nothing is left to poll.
    fn disable(&mut self);

    /// Polling is still needed; arm the next trigger.
    fn rearm(&mut self);
}

/// What a real (not rate-limited away) check did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Number of events drained from the backend.
    pub events: usize,
    /// Processes that changed, in the order their first event arrived.
    pub changed: Vec<ProcessId>,
    /// True when every tracked process has finished.
    pub all_finished: bool,
}

pub mod controller;
pub mod ticker;

pub use controller::ExecutionController;
pub use ticker::TickScheduler;
