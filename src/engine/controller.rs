// src/engine/controller.rs

use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, info, trace, warn};

use crate::errors::Result;
use crate::exec::ProcessBackend;
use crate::table::{ProcessTable, TrackedProcess};
use crate::types::ProcessId;

use super::{CheckReport, PollScheduler, ProcessDisplay};

/// Drives spawn and poll cycles on behalf of a single-threaded front end.
///
/// Nothing in here blocks: spawning returns once the OS process exists and
/// checks only drain what the readers have already queued.
pub struct ExecutionController<B, D, S>
where
    B: ProcessBackend,
    D: ProcessDisplay,
    S: PollScheduler,
{
    backend: B,
    table: ProcessTable,
    display: D,
    scheduler: S,
    min_check_interval: Duration,
    last_check: Option<Instant>,
    polling: bool,
}

impl<B, D, S> fmt::Debug for ExecutionController<B, D, S>
where
    B: ProcessBackend,
    D: ProcessDisplay,
    S: PollScheduler,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionController")
            .field("table", &self.table)
            .field("min_check_interval", &self.min_check_interval)
            .field("polling", &self.polling)
            .finish_non_exhaustive()
    }
}

impl<B, D, S> ExecutionController<B, D, S>
where
    B: ProcessBackend,
    D: ProcessDisplay,
    S: PollScheduler,
{
    pub fn new(backend: B, display: D, scheduler: S, min_check_interval: Duration) -> Self {
        Self {
            backend,
            table: ProcessTable::new(),
            display,
            scheduler,
            min_check_interval,
            last_check: None,
            polling: false,
        }
    }

    /// Spawn `command`, start tracking it and make sure polling is on.
    ///
    /// A spawn failure is returned as is and leaves the table untouched. If
    /// the new pid cannot be tracked, the process is terminated again.
    pub fn execute(&mut self, command: &str) -> Result<ProcessId> {
        let pid = self.backend.spawn(command)?;
        let process = match self.table.add(command, pid) {
            Ok(process) => process,
            Err(err) => {
                warn!(%pid, error = %err, "cannot track spawned process; terminating it");
                if let Err(e) = self.backend.terminate(pid) {
                    debug!(%pid, error = %e, "could not signal untracked process");
                }
                return Err(err);
            }
        };
        info!(%pid, command = %command, "executing");
        self.display.notify_new(process);

        self.ensure_polling();
        self.check_now();

        Ok(pid)
    }

    /// Rate-limited check: does nothing if the previous real check was less
    /// than `min_check_interval` ago.
    pub fn check(&mut self) -> Option<CheckReport> {
        if let Some(last) = self.last_check {
            if last.elapsed() < self.min_check_interval {
                trace!("check skipped; minimum interval not reached");
                return None;
            }
        }
        Some(self.check_now())
    }

    /// Drain the backend, apply every event, notify the display once per
    /// changed process and update polling.
    pub fn check_now(&mut self) -> CheckReport {
        self.last_check = Some(Instant::now());

        let events = self.backend.drain();
        let event_count = events.len();

        let mut seen = HashSet::new();
        let mut changed = Vec::new();
        for event in events {
            if let Some(pid) = self.table.apply(event) {
                if seen.insert(pid) {
                    changed.push(pid);
                }
            }
        }

        for pid in &changed {
            if let Some(process) = self.table.get(*pid) {
                self.display.notify_updated(process);
            }
        }

        let all_finished = self.table.all_finished();
        if all_finished {
            if self.polling {
                debug!("all processes finished; disabling polling");
                self.scheduler.disable();
                self.polling = false;
            }
        } else {
            self.scheduler.rearm();
        }

        if event_count > 0 {
            debug!(
                events = event_count,
                changed = changed.len(),
                all_finished,
                "check applied events"
            );
        }

        CheckReport {
            events: event_count,
            changed,
            all_finished,
        }
    }

    /// Send a termination signal to one process. Its record turns finished
    /// once the reader reports the exit.
    pub fn kill(&mut self, pid: ProcessId) -> Result<()> {
        let backend = &mut self.backend;
        self.table.kill(pid, |pid| backend.terminate(pid))
    }

    /// Kill every running process, then stop the backend.
    pub fn stop(&mut self) {
        let backend = &mut self.backend;
        let signalled = self.table.kill_all(|pid| backend.terminate(pid));
        info!(signalled, "stopping controller");
        self.backend.stop();
    }

    /// True while any tracked process has not finished.
    pub fn any_running(&self) -> bool {
        !self.table.all_finished()
    }

    /// Whether the periodic trigger is currently enabled.
    pub fn is_polling(&self) -> bool {
        self.polling
    }

    pub fn process(&self, pid: ProcessId) -> Option<&TrackedProcess> {
        self.table.get(pid)
    }

    /// All processes in spawn order.
    pub fn processes(&self) -> impl Iterator<Item = &TrackedProcess> {
        self.table.iter()
    }

    pub fn table(&self) -> &ProcessTable {
        &self.table
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn ensure_polling(&mut self) {
        if self.polling {
            return;
        }
        debug!("enabling polling");
        self.scheduler.enable();
        self.polling = true;
    }
}

impl<B, D, S> Drop for ExecutionController<B, D, S>
where
    B: ProcessBackend,
    D: ProcessDisplay,
    S: PollScheduler,
{
    fn drop(&mut self) {
        if self.any_running() {
            warn!(
                running = self.table.running().count(),
                "controller dropped with processes still running"
            );
        }
    }
}
