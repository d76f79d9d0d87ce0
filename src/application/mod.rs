// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Coordinates the other layers for one command. No merging
// logic and no console output lives here; the CLI prints,
// the data layer merges.

/// Run configuration: defaults, JSON file, validation, sources
pub mod config;

/// All file + leave-one-out folds + manifest
pub mod prepare_use_case;

/// Preflight check and fold table
pub mod inspect_use_case;
