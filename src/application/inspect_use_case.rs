// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Read-only views of a configured run:
//
//   check  — open every source and report what was found
//   plan   — list each fold's held-out source, pooled sources
//            and output names, without opening anything

use anyhow::Result;
use serde::Serialize;

use crate::application::config::PrepareConfig;
use crate::data::{
    loader::{check_sources, SourceReport},
    planner::LeaveOneOutPlanner,
};
use crate::domain::sink::SinkTarget;

/// One row of the fold table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanRow {
    pub index:    usize,
    pub held_out: String,
    pub pooled:   Vec<String>,
    pub train:    String,
    pub test:     String,
}

pub struct InspectUseCase {
    config: PrepareConfig,
}

impl InspectUseCase {
    pub fn new(config: PrepareConfig) -> Self {
        Self { config }
    }

    /// Report on every source; unreadable sources are reported, not fatal.
    pub fn check(&self) -> Result<Vec<SourceReport>> {
        let sources = self.config.resolve_sources()?;
        Ok(check_sources(&sources, self.config.header_length))
    }

    /// The fold table in plan-index order.
    pub fn plan(&self) -> Result<Vec<PlanRow>> {
        self.config.validate()?;
        let names   = self.config.source_names()?;
        let naming  = &self.config.naming;
        let planner = LeaveOneOutPlanner::new(self.config.rotation);

        Ok(planner
            .plans_for(names.len())
            .iter()
            .map(|plan| PlanRow {
                index:    plan.index(),
                held_out: names[plan.held_out()].clone(),
                pooled:   plan.pooled().map(|i| names[i].clone()).collect(),
                train:    naming.file_name(SinkTarget::Train(plan.index())),
                test:     naming.file_name(SinkTarget::Test(plan.index())),
            })
            .collect())
    }
}
