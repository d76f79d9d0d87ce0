// ============================================================
// Layer 6 — Run Manifest
// ============================================================
// Summary of one run written next to the outputs as JSON:
// which sources went in, which rotation was used, and the
// line counts of the All file and of every fold.
//
// Example (abridged):
//   {
//     "header_length": 83,
//     "rotation": "descending",
//     "sources": ["Monday.arff", "Tuesday.arff"],
//     "all": { "sink": ".../All.arff", "sources": 2, ... },
//     "folds": [ { "index": 0, "held_out": "Tuesday.arff", ... } ],
//     "failed_plans": []
//   }

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};

use crate::domain::plan::{PlanOutcome, Rotation};
use crate::domain::sink::MergeStats;

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunManifest {
    pub header_length: usize,
    pub rotation:      Rotation,
    pub sources:       Vec<String>,
    pub all:           Option<MergeStats>,
    pub folds:         Vec<PlanOutcome>,
    pub failed_plans:  Vec<usize>,
}

impl RunManifest {
    pub fn new(header_length: usize, rotation: Rotation, sources: Vec<String>) -> Self {
        Self { header_length, rotation, sources, ..Self::default() }
    }

    /// Write the manifest into `dir` and return its path.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(self)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write manifest to '{}'", path.display()))?;

        tracing::debug!("Saved run manifest to '{}'", path.display());
        Ok(path)
    }
}
