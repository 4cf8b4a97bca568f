// src/exec/pool.rs

//! Pool of running commands and their reader workers.

use std::fmt;
use std::time::Duration;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::errors::{AsyncDoError, Result};
use crate::exec::command::shell_command;
use crate::exec::reader::AsyncReader;
use crate::exec::ProcessEvent;
use crate::types::ProcessId;

/// Tunables for [`ProcessPool`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolOptions {
    /// Upper bound for joining readers in [`ProcessPool::stop`].
    pub stop_timeout: Duration,
    /// Worker threads of the pool-owned runtime. `None` lets Tokio decide.
    pub worker_threads: Option<usize>,
    /// Shell used to interpret commands. `None` means the platform shell.
    pub shell: Option<String>,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            stop_timeout: Duration::from_secs(1),
            worker_threads: None,
            shell: None,
        }
    }
}

struct ReaderHandle {
    pid: ProcessId,
    handle: JoinHandle<()>,
}

/// Owns the reader workers of all running commands and the single queue they
/// report into.
///
/// The pool itself is driven from one synchronous thread: `spawn`, `drain`
/// and `any_running` never wait on a process. All blocking happens inside the
/// reader tasks, which run on a Tokio runtime that the pool either owns
/// ([`ProcessPool::new`]) or borrows ([`ProcessPool::with_handle`]).
pub struct ProcessPool {
    runtime: Option<Runtime>,
    handle: Handle,
    events_tx: mpsc::UnboundedSender<ProcessEvent>,
    events_rx: mpsc::UnboundedReceiver<ProcessEvent>,
    readers: Vec<ReaderHandle>,
    options: PoolOptions,
}

impl fmt::Debug for ProcessPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessPool")
            .field("readers", &self.readers.len())
            .field("owns_runtime", &self.runtime.is_some())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl ProcessPool {
    /// Create a pool with its own multi-threaded runtime for the readers.
    pub fn new(options: PoolOptions) -> Result<Self> {
        let mut builder = Builder::new_multi_thread();
        builder.enable_all().thread_name("asyncdo-reader");
        if let Some(n) = options.worker_threads {
            builder.worker_threads(n);
        }
        let runtime = builder.build()?;
        let handle = runtime.handle().clone();

        Ok(Self::build(Some(runtime), handle, options))
    }

    /// Create a pool whose readers run on an existing runtime.
    pub fn with_handle(handle: Handle, options: PoolOptions) -> Self {
        Self::build(None, handle, options)
    }

    fn build(runtime: Option<Runtime>, handle: Handle, options: PoolOptions) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            runtime,
            handle,
            events_tx,
            events_rx,
            readers: Vec::new(),
            options,
        }
    }

    /// Runtime the readers run on.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Launch `command` and start its reader. Returns as soon as the OS
    /// process exists.
    pub fn spawn(&mut self, command: &str) -> Result<ProcessId> {
        // tokio::process needs the runtime's reactor for the child pipes.
        let _guard = self.handle.enter();

        let mut child = shell_command(command, self.options.shell.as_deref())
            .spawn()
            .map_err(|source| AsyncDoError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let pid = match child.id() {
            Some(raw) => ProcessId::from(raw),
            None => {
                return Err(AsyncDoError::Spawn {
                    command: command.to_string(),
                    source: std::io::Error::other("process exited before its id was read"),
                });
            }
        };

        info!(%pid, command = %command, "spawned process");

        let reader = AsyncReader::new(pid, child, self.events_tx.clone());
        let handle = self.handle.spawn(reader.run());
        self.readers.push(ReaderHandle { pid, handle });

        Ok(pid)
    }

    /// Take every event queued since the last call, in arrival order.
    pub fn drain(&mut self) -> Vec<ProcessEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            events.push(event);
        }

        if !events.is_empty() {
            trace!(count = events.len(), "drained events");
        }
        events
    }

    /// True while at least one reader is still active. Forgets readers that
    /// have stopped.
    pub fn any_running(&mut self) -> bool {
        self.cleanup();
        !self.readers.is_empty()
    }

    /// Number of readers still active.
    pub fn running_count(&mut self) -> usize {
        self.cleanup();
        self.readers.len()
    }

    fn cleanup(&mut self) {
        self.readers.retain(|r| {
            let done = r.handle.is_finished();
            if done {
                debug!(pid = %r.pid, "reader finished; forgetting it");
            }
            !done
        });
    }

    /// Join all readers, waiting at most `stop_timeout` in total.
    ///
    /// Processes are not killed here; a reader whose command ignores
    /// termination keeps running after the timeout. Must be called from
    /// outside an async context.
    pub fn stop(&mut self) {
        self.cleanup();
        if self.readers.is_empty() {
            return;
        }

        if Handle::try_current().is_ok() {
            warn!("stop called from inside an async context; not joining readers");
            return;
        }

        let timeout = self.options.stop_timeout;
        let readers = &mut self.readers;
        let joined = self.handle.block_on(async {
            tokio::time::timeout(timeout, async {
                for reader in readers.iter_mut() {
                    if let Err(e) = (&mut reader.handle).await {
                        warn!(pid = %reader.pid, error = %e, "reader task failed");
                    }
                }
            })
            .await
        });

        if joined.is_err() {
            warn!(
                timeout_ms = timeout.as_millis() as u64,
                "some readers did not finish before the stop timeout"
            );
        }

        self.cleanup();
        info!(remaining = self.readers.len(), "process pool stopped");
    }
}

impl Drop for ProcessPool {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
