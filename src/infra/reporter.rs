// ============================================================
// Layer 6 — Progress Reporters
// ============================================================
// ProgressReporter implementations handed to the merge core.
//
//   TracingReporter — one info line per source and per plan
//   SilentReporter  — reports nothing

use crate::domain::plan::PlanOutcome;
use crate::domain::sink::SinkTarget;
use crate::domain::traits::ProgressReporter;

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn source_started(&self, source: &str, target: SinkTarget, sink: &str) {
        let kind = match target {
            SinkTarget::All      => "all",
            SinkTarget::Train(_) => "training",
            SinkTarget::Test(_)  => "test",
        };
        tracing::info!("Adding '{}' to {} file '{}'", source, kind, sink);
    }

    fn plan_started(&self, index: usize, held_out: &str) {
        tracing::info!("Starting set {} (held out: '{}')", index, held_out);
    }

    fn plan_finished(&self, outcome: &PlanOutcome) {
        tracing::info!(
            "Finished set {}: {} training lines, {} test lines",
            outcome.index,
            outcome.train.lines_written,
            outcome.test.lines_written,
        );
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
