use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use asyncdo::errors::{AsyncDoError, Result};
use asyncdo::exec::{ProcessBackend, ProcessEvent};
use asyncdo::types::ProcessId;

/// First pid handed out by a [`FakeBackend`].
pub const FIRST_FAKE_PID: u32 = 1000;

/// Exit code a fake process reports after being terminated (SIGTERM).
pub const TERMINATED_EXIT_CODE: i32 = -15;

#[derive(Debug, Default)]
struct FakeState {
    spawned: Vec<(ProcessId, String)>,
    queued: VecDeque<ProcessEvent>,
    running: HashSet<ProcessId>,
    terminated: Vec<ProcessId>,
    unkillable: HashSet<ProcessId>,
    fail_spawns: bool,
    next_pid: Option<ProcessId>,
    stop_calls: usize,
    drain_calls: usize,
}

/// A backend that spawns nothing.
///
/// - every `spawn` records the command and hands out the next fake pid
/// - events are scripted by the test through [`FakeBackendHandle::push`]
/// - `terminate` queues a `Completion` with [`TERMINATED_EXIT_CODE`], like a
///   real process dying from SIGTERM
pub struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
}

/// Test-side view of a [`FakeBackend`] owned by a controller.
#[derive(Clone)]
pub struct FakeBackendHandle {
    state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    pub fn new() -> (Self, FakeBackendHandle) {
        let state = Arc::new(Mutex::new(FakeState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            FakeBackendHandle { state },
        )
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }
}

impl ProcessBackend for FakeBackend {
    fn spawn(&mut self, command: &str) -> Result<ProcessId> {
        let mut state = self.state();
        if state.fail_spawns {
            return Err(AsyncDoError::Spawn {
                command: command.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "fake spawn failure"),
            });
        }

        let pid = state
            .next_pid
            .take()
            .unwrap_or_else(|| ProcessId::new(FIRST_FAKE_PID + state.spawned.len() as u32));
        state.spawned.push((pid, command.to_string()));
        state.running.insert(pid);
        Ok(pid)
    }

    fn drain(&mut self) -> Vec<ProcessEvent> {
        let mut state = self.state();
        state.drain_calls += 1;
        let events: Vec<ProcessEvent> = state.queued.drain(..).collect();
        for event in &events {
            if event.is_completion() {
                state.running.remove(&event.pid());
            }
        }
        events
    }

    fn any_running(&mut self) -> bool {
        !self.state().running.is_empty()
    }

    fn terminate(&mut self, pid: ProcessId) -> Result<()> {
        let mut state = self.state();
        state.terminated.push(pid);

        let already_exiting = state
            .queued
            .iter()
            .any(|e| e.is_completion() && e.pid() == pid);
        if state.unkillable.contains(&pid) || !state.running.contains(&pid) || already_exiting {
            return Err(AsyncDoError::Signal {
                pid,
                source: std::io::Error::from_raw_os_error(3), // ESRCH
            });
        }

        state.queued.push_back(ProcessEvent::Completion {
            pid,
            exit_code: TERMINATED_EXIT_CODE,
        });
        Ok(())
    }

    fn stop(&mut self) {
        self.state().stop_calls += 1;
    }
}

impl FakeBackendHandle {
    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Queue events for the next drain.
    pub fn push(&self, events: impl IntoIterator<Item = ProcessEvent>) {
        self.state().queued.extend(events);
    }

    /// Make every following spawn fail (or succeed again).
    pub fn fail_spawns(&self, fail: bool) {
        self.state().fail_spawns = fail;
    }

    /// Hand out `pid` on the next spawn, as if the OS reused it.
    pub fn reuse_pid_next(&self, pid: ProcessId) {
        self.state().next_pid = Some(pid);
    }

    /// Make signalling `pid` fail as if the process were already gone.
    pub fn make_unkillable(&self, pid: ProcessId) {
        self.state().unkillable.insert(pid);
    }

    pub fn spawned_commands(&self) -> Vec<String> {
        self.state().spawned.iter().map(|(_, c)| c.clone()).collect()
    }

    pub fn terminated(&self) -> Vec<ProcessId> {
        self.state().terminated.clone()
    }

    pub fn stop_calls(&self) -> usize {
        self.state().stop_calls
    }

    pub fn drain_calls(&self) -> usize {
        self.state().drain_calls
    }

    pub fn queued(&self) -> usize {
        self.state().queued.len()
    }
}
