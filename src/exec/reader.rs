// src/exec/reader.rs

//! Per-process output reader.
//!
//! One [`AsyncReader`] runs as its own Tokio task for every spawned command.
//! It multiplexes stdout and stderr with `tokio::select!`, forwards each line
//! as soon as its terminator is seen, and finishes with a single
//! `Completion` event once the process has been reaped.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info, trace, warn};

use crate::errors::AsyncDoError;
use crate::exec::ProcessEvent;
use crate::types::{ProcessId, Stream};

/// How long a stream may stay silent after the process exited before the
/// reader stops waiting for more output. Covers grandchildren that inherited
/// the pipe and outlive the command itself.
pub const DRAIN_GRACE: Duration = Duration::from_millis(50);

/// Splits a byte stream into lines.
///
/// Partial lines survive cancellation inside `select!`: `read_until` appends
/// whatever it already read to `buf`, and the next call continues from there.
pub struct LineReader<R> {
    inner: BufReader<R>,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
            buf: Vec::new(),
        }
    }

    /// Next line without its `\n` / `\r\n` terminator, or `None` at EOF.
    ///
    /// Invalid UTF-8 is replaced rather than treated as an error, and a last
    /// line without a terminator is still returned.
    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        let n = self.inner.read_until(b'\n', &mut self.buf).await?;
        if n == 0 && self.buf.is_empty() {
            return Ok(None);
        }

        let mut bytes = std::mem::take(&mut self.buf);
        if bytes.last() == Some(&b'\n') {
            bytes.pop();
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
        }

        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }
}

async fn next_from<R: AsyncRead + Unpin>(
    reader: &mut Option<LineReader<R>>,
) -> io::Result<Option<String>> {
    match reader {
        Some(r) => r.next_line().await,
        None => Ok(None),
    }
}

/// Outcome of one round of the read loop.
enum Step {
    Line(Stream, io::Result<Option<String>>),
    Exited(io::Result<ExitStatus>),
    GraceElapsed,
}

/// Reader worker bound to one child process.
pub struct AsyncReader {
    pid: ProcessId,
    child: Child,
    events_tx: mpsc::UnboundedSender<ProcessEvent>,
}

impl AsyncReader {
    pub fn new(
        pid: ProcessId,
        child: Child,
        events_tx: mpsc::UnboundedSender<ProcessEvent>,
    ) -> Self {
        Self {
            pid,
            child,
            events_tx,
        }
    }

    /// Read until both streams are exhausted and the process has exited,
    /// then reap it and emit `Completion`.
    pub async fn run(mut self) {
        let pid = self.pid;
        debug!(%pid, "reader started");

        let mut stdout = self.child.stdout.take().map(LineReader::new);
        let mut stderr = self.child.stderr.take().map(LineReader::new);
        let mut exit: Option<io::Result<ExitStatus>> = None;

        while stdout.is_some() || stderr.is_some() {
            let step = tokio::select! {
                res = next_from(&mut stdout), if stdout.is_some() => Step::Line(Stream::Stdout, res),
                res = next_from(&mut stderr), if stderr.is_some() => Step::Line(Stream::Stderr, res),
                status = self.child.wait(), if exit.is_none() => Step::Exited(status),
                _ = sleep(DRAIN_GRACE), if exit.is_some() => Step::GraceElapsed,
            };

            match step {
                Step::Line(stream, Ok(Some(line))) => {
                    trace!(%pid, %stream, "line: {}", line);
                    self.emit(ProcessEvent::Output { pid, stream, line });
                }
                Step::Line(stream, Ok(None)) => {
                    debug!(%pid, %stream, "stream closed");
                    close(stream, &mut stdout, &mut stderr);
                }
                Step::Line(stream, Err(source)) => {
                    let err = AsyncDoError::StreamRead {
                        pid,
                        stream,
                        source,
                    };
                    warn!(%pid, %stream, error = %err, "treating stream as exhausted");
                    close(stream, &mut stdout, &mut stderr);
                }
                Step::Exited(status) => {
                    debug!(%pid, "process exited; draining remaining output");
                    exit = Some(status);
                }
                Step::GraceElapsed => {
                    debug!(
                        %pid,
                        "streams still open after exit but silent; stop reading"
                    );
                    break;
                }
            }
        }

        let status = match exit {
            Some(status) => status,
            None => self.child.wait().await,
        };

        let exit_code = match status {
            Ok(status) => exit_code_of(status),
            Err(e) => {
                warn!(%pid, error = %e, "waiting for process failed");
                -1
            }
        };

        info!(%pid, exit_code, "process finished");
        self.emit(ProcessEvent::Completion { pid, exit_code });
    }

    fn emit(&self, event: ProcessEvent) {
        if self.events_tx.send(event).is_err() {
            debug!(pid = %self.pid, "event queue closed; dropping event");
        }
    }
}

fn close<A, B>(stream: Stream, stdout: &mut Option<A>, stderr: &mut Option<B>) {
    match stream {
        Stream::Stdout => *stdout = None,
        Stream::Stderr => *stderr = None,
    }
}

/// Exit code as reported to the table: the process's own code, `-N` when it
/// was terminated by signal `N`, `-1` when neither is known.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    -1
}
