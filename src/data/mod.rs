// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything that reads sources and writes sinks.
//
//   source files
//       │
//       ▼
//   loader       → FileSource, discovery, preflight check
//       │
//       ▼
//   merger       → LineMerger: one header, all data lines
//       │
//       ▼
//   planner      → LeaveOneOutPlanner: N train/test folds
//
// None of these modules know about file names or the console;
// sinks and progress output are injected through the domain
// traits.

/// FileSource, source discovery and the preflight check
pub mod loader;

/// Header-aware line merging
pub mod merger;

/// Leave-one-out plan generation and execution
pub mod planner;

#[cfg(test)]
pub mod memory;
