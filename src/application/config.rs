// ============================================================
// Layer 2 — Run Configuration
// ============================================================
// Every option of a run in one serialisable struct. Values are
// resolved in three steps:
//
//   built-in defaults  →  JSON config file  →  CLI flags
//
// Missing fields in a config file fall back to the defaults
// thanks to #[serde(default)], so a file may set only what it
// needs, e.g. { "header_length": 12, "sources": ["a.arff"] }.
//
// When `sources` is empty the input directory is scanned for
// files with the naming extension, sorted by file name.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use crate::data::loader::{discover_sources, FileSource};
use crate::domain::errors::PrepError;
use crate::domain::naming::OutputNaming;
use crate::domain::plan::Rotation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepareConfig {
    pub input_dir:     PathBuf,
    pub output_dir:    PathBuf,
    pub sources:       Vec<String>,
    pub header_length: usize,
    pub naming:        OutputNaming,
    pub rotation:      Rotation,
    pub write_all:     bool,
    pub write_folds:   bool,
    pub keep_going:    bool,
    pub manifest:      bool,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            input_dir:     PathBuf::from("GeneralizedDataFiles"),
            output_dir:    PathBuf::from("GeneralizedOutputDataFiles"),
            sources:       Vec::new(),
            header_length: 83,
            naming:        OutputNaming::default(),
            rotation:      Rotation::Descending,
            write_all:     true,
            write_folds:   true,
            keep_going:    false,
            manifest:      true,
        }
    }
}

impl PrepareConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid config '{}'", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved config to '{}'", path.display());
        Ok(())
    }

    /// Reject settings that would make outputs collide or sources ambiguous.
    pub fn validate(&self) -> Result<(), PrepError> {
        let n = &self.naming;
        if n.all_name.is_empty() || n.train_prefix.is_empty() || n.test_prefix.is_empty() {
            return Err(PrepError::InvalidConfig(
                "output names and prefixes must not be empty".into(),
            ));
        }
        if n.train_prefix == n.test_prefix {
            return Err(PrepError::InvalidConfig(format!(
                "train and test prefix are both '{}'",
                n.train_prefix
            )));
        }

        let mut seen = HashSet::new();
        for name in &self.sources {
            if !seen.insert(name.as_str()) {
                return Err(PrepError::InvalidConfig(format!("source '{name}' listed twice")));
            }
        }
        Ok(())
    }

    /// Source names in merge order, discovering them when none are listed.
    pub fn source_names(&self) -> Result<Vec<String>> {
        if !self.sources.is_empty() {
            return Ok(self.sources.clone());
        }
        let mut found = discover_sources(&self.input_dir, &self.naming.extension)?;
        found.retain(|name| {
            let output = self.is_output_path(name);
            if output {
                tracing::debug!("Skipping '{}': it is an output of this run", name);
            }
            !output
        });
        tracing::info!(
            "No sources configured, discovered {} in '{}'",
            found.len(),
            self.input_dir.display()
        );
        Ok(found)
    }

    /// Validate and build the file-backed sources of this run.
    pub fn resolve_sources(&self) -> Result<Vec<FileSource>> {
        self.validate()?;
        let names = self.source_names()?;
        if names.is_empty() {
            return Err(PrepError::NoSources.into());
        }
        if let Some(name) = names.iter().find(|name| self.is_output_path(name)) {
            return Err(PrepError::InvalidConfig(format!(
                "source '{}' is also an output file in '{}'",
                name,
                self.output_dir.display()
            ))
            .into());
        }
        Ok(names
            .iter()
            .map(|name| FileSource::in_dir(&self.input_dir, name))
            .collect())
    }
}

impl PrepareConfig {
    /// True when source `name` sits in the output directory under a
    /// name the output naming can produce, i.e. a run would truncate it.
    fn is_output_path(&self, name: &str) -> bool {
        let path = self.input_dir.join(name);
        let (Some(dir), Some(file)) = (path.parent(), path.file_name().and_then(|f| f.to_str()))
        else {
            return false;
        };
        same_dir(dir, &self.output_dir) && self.naming.is_output_name(file)
    }
}

fn same_dir(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
