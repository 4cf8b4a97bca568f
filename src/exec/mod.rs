// src/exec/mod.rs

//! Process execution layer.
//!
//! This module actually runs commands, using `tokio::process::Command`, and
//! reports what they print back to the controller as [`ProcessEvent`]s.
//!
//! - [`command`] builds the shell invocation for a command string.
//! - [`reader`] holds the per-process reader worker.
//! - [`pool`] owns the running readers and the shared event queue.
//! - [`backend`] provides the `ProcessBackend` trait that the controller
//!   uses, implemented by [`ProcessPool`] in production and by fakes in
//!   tests.

pub mod backend;
pub mod command;
pub mod event;
pub mod pool;
pub mod reader;

pub use backend::ProcessBackend;
pub use event::ProcessEvent;
pub use pool::{PoolOptions, ProcessPool};
pub use reader::AsyncReader;
