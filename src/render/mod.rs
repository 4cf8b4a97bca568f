// src/render/mod.rs

//! Text rendering of tracked processes.
//!
//! - [`format`] turns processes into lines of text (headers, command list
//!   rows, elapsed time).
//! - [`terminal`] is a `ProcessDisplay` writing those lines to any
//!   `io::Write`.

pub mod format;
pub mod terminal;

pub use terminal::TerminalDisplay;

/// Presentation settings, from the `[display]` config section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Commands longer than this are truncated in the command list.
    pub command_width: usize,
    /// Prepended to every stderr line.
    pub stderr_prefix: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            command_width: 30,
            stderr_prefix: "E> ".to_string(),
        }
    }
}
