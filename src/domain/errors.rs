// ============================================================
// Layer 3 — Error Types
// ============================================================
// Every failure the merge core can report.
//
// The core only distinguishes between "could not read a source"
// and "could not write a sink". A third risk, sources whose
// headers silently differ, is never detected: all sources in a
// run are assumed to share one schema and one header length.
//
// PlanFailed wraps whatever went wrong while building one
// leave-one-out fold so the message names the fold index.
//
// Reference: Rust Book §9 (Error Handling)
//            thiserror crate documentation

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrepError {
    #[error("source '{name}' could not be read: {source}")]
    SourceUnavailable {
        name:   String,
        source: io::Error,
    },

    #[error("sink '{name}' could not be written: {source}")]
    SinkUnwritable {
        name:   String,
        source: io::Error,
    },

    #[error("plan {index} (held out '{held_out}') failed: {source}")]
    PlanFailed {
        index:    usize,
        held_out: String,
        source:   Box<PrepError>,
    },

    #[error("no sources to merge")]
    NoSources,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PrepError {
    pub fn source_unavailable(name: impl Into<String>, source: io::Error) -> Self {
        PrepError::SourceUnavailable { name: name.into(), source }
    }

    pub fn sink_unwritable(name: impl Into<String>, source: io::Error) -> Self {
        PrepError::SinkUnwritable { name: name.into(), source }
    }

    /// Index of the plan this error belongs to, if it came out of a fold.
    pub fn plan_index(&self) -> Option<usize> {
        match self {
            PrepError::PlanFailed { index, .. } => Some(*index),
            _ => None,
        }
    }
}
