//! Append-only output of a single process.

use crate::types::Stream;

/// One line of output, tagged with the stream it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub stream: Stream,
    pub text: String,
}

/// Lines of a process's stdout and stderr in arrival order.
///
/// Arrival order keeps each stream's own order, but the interleaving between
/// stdout and stderr is whatever the reader happened to see first.
#[derive(Debug, Clone, Default)]
pub struct OutputLog {
    lines: Vec<OutputLine>,
}

impl OutputLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stream: Stream, text: impl Into<String>) {
        self.lines.push(OutputLine {
            stream,
            text: text.into(),
        });
    }

    pub fn all(&self) -> &[OutputLine] {
        &self.lines
    }

    /// Lines from `offset` on. An offset past the end yields an empty slice.
    pub fn from_offset(&self, offset: usize) -> &[OutputLine] {
        self.lines.get(offset..).unwrap_or(&[])
    }

    /// Lines of one stream only, in that stream's order.
    pub fn stream(&self, stream: Stream) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(move |l| l.stream == stream)
            .map(|l| l.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
