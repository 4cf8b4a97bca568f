// src/table/mod.rs

//! Process lifecycle model.
//!
//! - [`output`] holds the per-process output log.
//! - [`process`] defines `TrackedProcess`, the durable record of a command.
//! - [`signal`] delivers termination signals to OS processes.
//!
//! [`ProcessTable`] owns every record and is mutated only by applying
//! [`ProcessEvent`]s, all on the controller's thread.

pub mod output;
pub mod process;
pub mod signal;

use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::errors::{AsyncDoError, Result};
use crate::exec::ProcessEvent;
use crate::types::ProcessId;

pub use output::{OutputLine, OutputLog};
pub use process::{ProcessStatus, TrackedProcess};

/// Everything ever spawned, in spawn order.
#[derive(Debug, Default)]
pub struct ProcessTable {
    processes: Vec<TrackedProcess>,
    /// pid -> index of the newest record with that pid.
    index: HashMap<ProcessId, usize>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly spawned command.
    ///
    /// A finished record whose pid the OS has since reused stays in the
    /// listing; the pid then refers to the new record.
    pub fn add(&mut self, command: &str, pid: ProcessId) -> Result<&TrackedProcess> {
        if let Some(existing) = self.get(pid) {
            if !existing.has_finished() {
                return Err(AsyncDoError::DuplicateProcessId(pid));
            }
            debug!(%pid, "pid reused by the OS; previous record kept in listing");
        }

        let idx = self.processes.len();
        self.processes.push(TrackedProcess::new(pid, command));
        self.index.insert(pid, idx);

        Ok(&self.processes[idx])
    }

    /// Apply one event. Returns the pid it changed, or `None` when the event
    /// was dropped (unknown pid, or nothing left to change).
    pub fn apply(&mut self, event: ProcessEvent) -> Option<ProcessId> {
        let pid = event.pid();
        let Some(process) = self.index.get(&pid).map(|&i| &mut self.processes[i]) else {
            let err = AsyncDoError::UnknownProcessId(pid);
            warn!(%pid, error = %err, "dropping event");
            return None;
        };

        if process.has_finished() {
            warn!(%pid, ?event, "event for an already finished process; dropping");
            return None;
        }

        match event {
            ProcessEvent::Output { stream, line, .. } => {
                process.append(stream, line);
            }
            ProcessEvent::Completion { exit_code, .. } => {
                process.complete(exit_code, Instant::now());
                info!(
                    %pid,
                    exit_code,
                    elapsed_ms = process.elapsed().as_millis() as u64,
                    "process marked finished"
                );
            }
        }

        Some(pid)
    }

    pub fn get(&self, pid: ProcessId) -> Option<&TrackedProcess> {
        self.index.get(&pid).map(|&i| &self.processes[i])
    }

    /// All records in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &TrackedProcess> {
        self.processes.iter()
    }

    pub fn running(&self) -> impl Iterator<Item = &TrackedProcess> {
        self.processes.iter().filter(|p| !p.has_finished())
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// True iff no tracked process is still running.
    pub fn all_finished(&self) -> bool {
        self.processes.iter().all(TrackedProcess::has_finished)
    }

    /// Signal one process through `terminate`. A finished process is left
    /// alone.
    pub fn kill<F>(&self, pid: ProcessId, terminate: F) -> Result<()>
    where
        F: FnOnce(ProcessId) -> Result<()>,
    {
        let process = self.get(pid).ok_or(AsyncDoError::UnknownProcessId(pid))?;
        if process.has_finished() {
            debug!(%pid, "kill requested for finished process; nothing to do");
            return Ok(());
        }

        info!(%pid, "terminating process");
        terminate(pid)
    }

    /// Signal every running process. Failures are logged and skipped; the
    /// process has most likely exited already. Returns how many signals
    /// were delivered.
    pub fn kill_all<F>(&self, mut terminate: F) -> usize
    where
        F: FnMut(ProcessId) -> Result<()>,
    {
        let mut delivered = 0;
        for process in self.running() {
            let pid = process.pid();
            match terminate(pid) {
                Ok(()) => {
                    info!(%pid, "sent termination signal");
                    delivered += 1;
                }
                Err(e) => {
                    debug!(%pid, error = %e, "could not signal process; ignoring");
                }
            }
        }
        delivered
    }
}
