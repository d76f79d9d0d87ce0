// ============================================================
// Layer 3 — Sinks
// ============================================================
// A Sink is an append-only line destination. It is created
// empty, receives lines in order, and is closed exactly once.
//
// Each logical output of a run is identified by a SinkTarget:
//
//   All        — every source merged under one header
//   Train(k)   — the pooled sources of plan k
//   Test(k)    — the held-out source of plan k
//
// How a target maps to a real destination (a file, nothing at
// all in a dry run, a buffer in tests) is decided by whoever
// implements SinkFactory.

use std::fmt;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::domain::errors::PrepError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkTarget {
    All,
    Train(usize),
    Test(usize),
}

impl fmt::Display for SinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkTarget::All      => write!(f, "all"),
            SinkTarget::Train(k) => write!(f, "train[{k}]"),
            SinkTarget::Test(k)  => write!(f, "test[{k}]"),
        }
    }
}

/// Counters collected while merging into one sink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    /// Name of the sink the lines went to
    pub sink: String,

    /// Number of sources read into this sink
    pub sources: usize,

    /// Lines appended to the sink
    pub lines_written: usize,

    /// Header lines dropped because an earlier source already supplied them
    pub header_lines_skipped: usize,
}

impl MergeStats {
    pub fn new(sink: impl Into<String>) -> Self {
        Self { sink: sink.into(), ..Self::default() }
    }
}

/// An open, named line destination.
///
/// Dropping a Sink releases the underlying handle; `close` also
/// flushes and reports any error doing so.
pub struct Sink {
    target: SinkTarget,
    name:   String,
    writer: Box<dyn Write>,
}

impl Sink {
    pub fn new(target: SinkTarget, name: impl Into<String>, writer: Box<dyn Write>) -> Self {
        Self { target, name: name.into(), writer }
    }

    /// Which logical output this sink is
    pub fn target(&self) -> SinkTarget {
        self.target
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append one line followed by a `\n` terminator.
    pub fn write_line(&mut self, line: &[u8]) -> Result<(), PrepError> {
        self.writer
            .write_all(line)
            .and_then(|_| self.writer.write_all(b"\n"))
            .map_err(|e| PrepError::sink_unwritable(&self.name, e))
    }

    /// Flush and release the sink. No writes are possible afterwards.
    pub fn close(mut self) -> Result<(), PrepError> {
        self.writer
            .flush()
            .map_err(|e| PrepError::sink_unwritable(&self.name, e))
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("target", &self.target)
            .field("name", &self.name)
            .finish()
    }
}
