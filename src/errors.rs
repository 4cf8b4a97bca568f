// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::types::{ProcessId, Stream};

#[derive(Error, Debug)]
pub enum AsyncDoError {
    /// The OS could not create the process. Surfaced to the caller of
    /// `execute`; nothing is tracked for it.
    #[error("failed to spawn command `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("process id {0} is already tracked and still running")]
    DuplicateProcessId(ProcessId),

    #[error("unknown process id: {0}")]
    UnknownProcessId(ProcessId),

    /// Reading one of a process's streams failed. Only ever logged: the
    /// stream is treated as exhausted and the process keeps running.
    #[error("reading {stream} of process {pid} failed: {source}")]
    StreamRead {
        pid: ProcessId,
        stream: Stream,
        #[source]
        source: std::io::Error,
    },

    #[error("could not signal process {pid}: {source}")]
    Signal {
        pid: ProcessId,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, AsyncDoError>;
