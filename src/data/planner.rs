// ============================================================
// Layer 4 — Leave-One-Out Planner
// ============================================================
// Builds and executes the N folds of leave-one-out
// cross-validation over N sources.
//
// Example with 3 sources and the default descending rotation:
//
//   plan 0:  Train0 = A + B     Test0 = C
//   plan 1:  Train1 = A + C     Test1 = B
//   plan 2:  Train2 = B + C     Test2 = A
//
// Each plan opens its two sinks, runs the merger once and closes
// both sinks before the next plan starts. A failing plan stops
// here; outputs of earlier plans stay where they are. Callers
// that want to continue past a failure drive `execute_plan`
// themselves.

use crate::data::merger::LineMerger;
use crate::domain::errors::PrepError;
use crate::domain::plan::{MergePlan, PlanOutcome, Rotation};
use crate::domain::sink::SinkTarget;
use crate::domain::traits::{LineSource, SinkFactory};

#[derive(Debug, Clone, Copy, Default)]
pub struct LeaveOneOutPlanner {
    rotation: Rotation,
}

impl LeaveOneOutPlanner {
    pub fn new(rotation: Rotation) -> Self {
        Self { rotation }
    }

    /// One plan per source, in plan-index order.
    pub fn generate_plans<S: LineSource>(&self, sources: &[S]) -> Vec<MergePlan> {
        self.plans_for(sources.len())
    }

    /// Same as `generate_plans` when only the source count is known.
    pub fn plans_for(&self, source_count: usize) -> Vec<MergePlan> {
        (0..source_count)
            .filter_map(|k| {
                self.rotation
                    .held_out_index(k, source_count)
                    .map(|held_out| MergePlan::new(k, held_out, source_count))
            })
            .collect()
    }

    /// Run a single plan. Errors come back wrapped in PlanFailed.
    pub fn execute_plan<S, F>(
        &self,
        merger:  &LineMerger<'_>,
        sources: &[S],
        plan:    &MergePlan,
        sinks:   &mut F,
    ) -> Result<PlanOutcome, PrepError>
    where
        S: LineSource,
        F: SinkFactory + ?Sized,
    {
        let held_out = sources
            .get(plan.held_out())
            .map(|s| s.name().to_string())
            .unwrap_or_default();

        merger.reporter().plan_started(plan.index(), &held_out);

        let outcome = run_plan(merger, sources, plan, sinks, &held_out).map_err(|e| {
            PrepError::PlanFailed {
                index:    plan.index(),
                held_out: held_out.clone(),
                source:   Box::new(e),
            }
        })?;

        merger.reporter().plan_finished(&outcome);
        Ok(outcome)
    }

    /// Run every plan in order, stopping at the first failure.
    pub fn execute<S, F>(
        &self,
        merger:  &LineMerger<'_>,
        sources: &[S],
        sinks:   &mut F,
    ) -> Result<Vec<PlanOutcome>, PrepError>
    where
        S: LineSource,
        F: SinkFactory + ?Sized,
    {
        self.generate_plans(sources)
            .iter()
            .map(|plan| self.execute_plan(merger, sources, plan, sinks))
            .collect()
    }
}

/// Open both sinks, merge, close both sinks.
fn run_plan<S, F>(
    merger:   &LineMerger<'_>,
    sources:  &[S],
    plan:     &MergePlan,
    sinks:    &mut F,
    held_out: &str,
) -> Result<PlanOutcome, PrepError>
where
    S: LineSource,
    F: SinkFactory + ?Sized,
{
    let mut train = sinks.create(SinkTarget::Train(plan.index()))?;
    let mut test  = sinks.create(SinkTarget::Test(plan.index()))?;

    let (train_stats, test_stats) =
        merger.merge_with_holdout(sources, plan, &mut train, &mut test)?;

    train.close()?;
    test.close()?;

    Ok(PlanOutcome {
        index:    plan.index(),
        held_out: held_out.to_string(),
        train:    train_stats,
        test:     test_stats,
    })
}
