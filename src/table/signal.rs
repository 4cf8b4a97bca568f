//! Delivering termination signals to tracked processes.

use crate::errors::{AsyncDoError, Result};
use crate::types::ProcessId;

/// Send SIGTERM to the process group led by `pid`, falling back to the
/// process itself when no such group exists.
///
/// Fails with [`AsyncDoError::Signal`] when neither can be signalled, which
/// usually means the process is already gone.
#[cfg(unix)]
pub fn terminate(pid: ProcessId) -> Result<()> {
    let raw = to_raw(pid)?;

    // SAFETY: kill(2) has no memory-safety preconditions; raw > 0, so this
    // targets exactly one process group or process.
    if unsafe { libc::kill(-raw, libc::SIGTERM) } == 0 {
        return Ok(());
    }
    if unsafe { libc::kill(raw, libc::SIGTERM) } == 0 {
        return Ok(());
    }

    Err(AsyncDoError::Signal {
        pid,
        source: std::io::Error::last_os_error(),
    })
}

#[cfg(not(unix))]
pub fn terminate(pid: ProcessId) -> Result<()> {
    Err(AsyncDoError::Signal {
        pid,
        source: std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "signals are only supported on unix",
        ),
    })
}

/// Pids 0 and anything that doesn't fit a positive `pid_t` would address
/// whole groups of unrelated processes.
#[cfg(unix)]
fn to_raw(pid: ProcessId) -> Result<libc::pid_t> {
    match libc::pid_t::try_from(pid.as_raw()) {
        Ok(raw) if raw > 0 => Ok(raw),
        _ => Err(AsyncDoError::Signal {
            pid,
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "refusing to signal a non-positive pid",
            ),
        }),
    }
}
