// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Subcommands:
//
//   prepare      — All file + every Train/Test fold (default run)
//   combine      — All file only
//   folds        — Train/Test folds only
//   check        — open every source, report first line and size
//   plan         — print the fold table, touch nothing
//   init-config  — write the effective configuration as JSON
//
// Every flag is optional; unset flags keep the value from
// --config, or the built-in default when no file is given.

use anyhow::{bail, Result};
use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::application::config::PrepareConfig;
use crate::domain::plan::Rotation;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the All file and every leave-one-out Train/Test pair
    Prepare(RunArgs),

    /// Write only the All file
    Combine(RunArgs),

    /// Write only the leave-one-out Train/Test pairs
    Folds(RunArgs),

    /// Check that every source can be read
    Check(SourceArgs),

    /// Show which source each fold holds out
    Plan(SourceArgs),

    /// Write the effective configuration to a JSON file
    InitConfig(InitArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotationArg {
    /// Fold 0 holds out the last source
    Descending,
    /// Fold 0 holds out the first source
    Ascending,
}

impl From<RotationArg> for Rotation {
    fn from(r: RotationArg) -> Self {
        match r {
            RotationArg::Descending => Rotation::Descending,
            RotationArg::Ascending  => Rotation::Ascending,
        }
    }
}

/// Where the sources are and how they are shaped.
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// JSON configuration file; flags below override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory containing the source files
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Directory the outputs are written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Number of header lines at the top of every source
    #[arg(long)]
    pub header_length: Option<usize>,

    /// Order in which sources are held out
    #[arg(long, value_enum)]
    pub rotation: Option<RotationArg>,

    /// Extension of input and output files, without the dot
    #[arg(long)]
    pub extension: Option<String>,

    /// Source file names in merge order; all files with the
    /// extension in the input directory when omitted
    pub sources: Vec<String>,
}

impl SourceArgs {
    /// Defaults, then the config file, then these flags.
    pub fn to_config(&self) -> Result<PrepareConfig> {
        let mut cfg = match &self.config {
            Some(path) => PrepareConfig::load(path)?,
            None       => PrepareConfig::default(),
        };

        if let Some(dir) = &self.input_dir {
            cfg.input_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            cfg.output_dir = dir.clone();
        }
        if let Some(h) = self.header_length {
            cfg.header_length = h;
        }
        if let Some(r) = self.rotation {
            cfg.rotation = r.into();
        }
        if let Some(ext) = &self.extension {
            cfg.naming.extension = ext.trim_start_matches('.').to_string();
        }
        if !self.sources.is_empty() {
            cfg.sources = self.sources.clone();
        }
        Ok(cfg)
    }
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Continue with the next fold when one fails
    #[arg(long)]
    pub keep_going: bool,

    /// Report what would be written without creating any file
    #[arg(long)]
    pub dry_run: bool,

    /// Do not write manifest.json
    #[arg(long)]
    pub no_manifest: bool,

    /// Only log warnings and the final summary
    #[arg(long, short)]
    pub quiet: bool,
}

impl RunArgs {
    pub fn to_config(&self) -> Result<PrepareConfig> {
        let mut cfg = self.source.to_config()?;
        if self.keep_going {
            cfg.keep_going = true;
        }
        if self.no_manifest {
            cfg.manifest = false;
        }
        Ok(cfg)
    }
}

#[derive(Args, Debug)]
pub struct InitArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// File to write
    #[arg(long, default_value = "arff-loo.json")]
    pub out: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    pub fn write(&self) -> Result<PathBuf> {
        if self.out.exists() && !self.force {
            bail!("'{}' already exists (use --force to overwrite)", self.out.display());
        }
        self.source.to_config()?.save(&self.out)?;
        Ok(self.out.clone())
    }
}
