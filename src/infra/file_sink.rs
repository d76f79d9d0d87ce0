// ============================================================
// Layer 6 — File Sinks
// ============================================================
// SinkFactory implementations.
//
//   FileSinks    — one file per target inside the output
//                  directory; creating a target truncates it
//   DryRunSinks  — same names, but every line is discarded,
//                  so a run can be previewed with real counts
//
// File layout with the default naming:
//
//   output_dir/
//     All.arff
//     Train0.arff   Test0.arff
//     Train1.arff   Test1.arff
//     ...

use anyhow::{Context, Result};
use std::{
    fs::{self, File},
    io::{self, BufWriter},
    path::PathBuf,
};

use crate::domain::errors::PrepError;
use crate::domain::naming::OutputNaming;
use crate::domain::sink::{Sink, SinkTarget};
use crate::domain::traits::SinkFactory;

pub struct FileSinks {
    dir:    PathBuf,
    naming: OutputNaming,
}

impl FileSinks {
    /// Create the output directory (like `mkdir -p`) and the factory.
    pub fn new(dir: impl Into<PathBuf>, naming: OutputNaming) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;
        Ok(Self { dir, naming })
    }

    pub fn path_of(&self, target: SinkTarget) -> PathBuf {
        self.dir.join(self.naming.file_name(target))
    }
}

impl SinkFactory for FileSinks {
    fn locate(&self, target: SinkTarget) -> String {
        self.path_of(target).display().to_string()
    }

    fn create(&mut self, target: SinkTarget) -> Result<Sink, PrepError> {
        let path = self.path_of(target);
        let name = path.display().to_string();
        let file = File::create(&path).map_err(|e| PrepError::sink_unwritable(&name, e))?;
        tracing::debug!("Created {} sink '{}'", target, name);
        Ok(Sink::new(target, name, Box::new(BufWriter::new(file))))
    }
}

pub struct DryRunSinks {
    dir:    PathBuf,
    naming: OutputNaming,
}

impl DryRunSinks {
    pub fn new(dir: impl Into<PathBuf>, naming: OutputNaming) -> Self {
        Self { dir: dir.into(), naming }
    }
}

impl SinkFactory for DryRunSinks {
    fn locate(&self, target: SinkTarget) -> String {
        self.dir.join(self.naming.file_name(target)).display().to_string()
    }

    fn create(&mut self, target: SinkTarget) -> Result<Sink, PrepError> {
        Ok(Sink::new(target, self.locate(target), Box::new(io::sink())))
    }
}
