// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Concrete implementations of the domain traits plus files
// written next to the outputs:
//
//   file_sink.rs — FileSinks (real files) and DryRunSinks
//   reporter.rs  — TracingReporter and SilentReporter
//   manifest.rs  — manifest.json summarising a run

/// SinkFactory implementations
pub mod file_sink;

/// ProgressReporter implementations
pub mod reporter;

/// Run manifest persistence
pub mod manifest;
