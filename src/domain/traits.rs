// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The merge core never opens a file or prints a message
// itself. It talks to three capabilities:
//
//   LineSource        — something that can be opened and read
//                       line by line (a file, a test buffer)
//   SinkFactory       — hands out a fresh Sink per SinkTarget
//                       (real files, or nothing in a dry run)
//   ProgressReporter  — told when a source or a plan starts
//                       and when a plan finishes
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use std::io::{self, BufRead};

use crate::domain::errors::PrepError;
use crate::domain::plan::PlanOutcome;
use crate::domain::sink::{Sink, SinkTarget};

// ─── LineSource ───────────────────────────────────────────────────────────────
/// A named, read-only, line-oriented input.
///
/// Implementations:
///   - FileSource   → a file on disk
///   - MemorySource → an in-memory buffer (tests)
pub trait LineSource {
    /// Identity of the source, used in progress and error messages
    fn name(&self) -> &str;

    /// Open a fresh reader positioned at the first line.
    /// Every call starts over, so one source can feed many plans.
    fn open(&self) -> io::Result<Box<dyn BufRead + '_>>;
}

// ─── SinkFactory ──────────────────────────────────────────────────────────────
/// Creates the destination for each logical output of a run.
pub trait SinkFactory {
    /// Human-readable location of a target (a path, usually)
    fn locate(&self, target: SinkTarget) -> String;

    /// Create the target empty, discarding any previous contents.
    fn create(&mut self, target: SinkTarget) -> Result<Sink, PrepError>;
}

// ─── ProgressReporter ─────────────────────────────────────────────────────────
/// Hooks invoked by the core at well-defined points.
/// All methods default to doing nothing.
pub trait ProgressReporter {
    /// A source is about to be copied into `sink`, which holds `target`
    fn source_started(&self, _source: &str, _target: SinkTarget, _sink: &str) {}

    /// Plan `index` is about to run with `held_out` as its test source
    fn plan_started(&self, _index: usize, _held_out: &str) {}

    /// Plan finished and both of its sinks are closed
    fn plan_finished(&self, _outcome: &PlanOutcome) {}
}
