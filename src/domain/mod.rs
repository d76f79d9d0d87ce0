// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits describing the problem:
// sources and sinks, the roles a source plays in a
// leave-one-out plan, and how outputs are named.
//
// Rules for this layer:
//   - NO file system access
//   - NO clap or presentation types
//   - Only structs, enums, traits and pure functions

/// Error taxonomy shared by every layer below the CLI
pub mod errors;

/// Roles, rotation order, merge plans and plan outcomes
pub mod plan;

/// Sink targets, open sinks and merge counters
pub mod sink;

/// File names for each sink target
pub mod naming;

/// LineSource, SinkFactory and ProgressReporter
pub mod traits;
