// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap, turns them into a PrepareConfig
// and hands off to a use case. Printing results to stdout
// happens here and nowhere else.

pub mod commands;

use anyhow::{bail, Result};
use clap::Parser;
use commands::{Commands, RunArgs, SourceArgs};

use crate::application::{
    inspect_use_case::InspectUseCase,
    prepare_use_case::PrepareUseCase,
};
use crate::infra::manifest::RunManifest;

#[derive(Parser, Debug)]
#[command(
    name = "arff-loo",
    version,
    about = "Combine ARFF files sharing one header and build leave-one-out train/test splits."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Which outputs a run subcommand produces.
#[derive(Debug, Clone, Copy)]
enum Outputs {
    Everything,
    AllOnly,
    FoldsOnly,
}

impl Cli {
    /// Log filter for this invocation: warnings only under `--quiet`.
    pub fn log_directive(&self) -> &'static str {
        let quiet = match &self.command {
            Commands::Prepare(args) | Commands::Combine(args) | Commands::Folds(args) => args.quiet,
            _ => false,
        };
        if quiet { "arff_loo=warn" } else { "arff_loo=info" }
    }

    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Prepare(args)    => run_prepare(args, Outputs::Everything),
            Commands::Combine(args)    => run_prepare(args, Outputs::AllOnly),
            Commands::Folds(args)      => run_prepare(args, Outputs::FoldsOnly),
            Commands::Check(args)      => run_check(args),
            Commands::Plan(args)       => run_plan(args),
            Commands::InitConfig(args) => {
                let path = args.write()?;
                println!("Configuration written to {}", path.display());
                Ok(())
            }
        }
    }
}

fn run_prepare(args: RunArgs, outputs: Outputs) -> Result<()> {
    let mut cfg = args.to_config()?;
    match outputs {
        Outputs::Everything => {}
        Outputs::AllOnly    => cfg.write_folds = false,
        Outputs::FoldsOnly  => cfg.write_all = false,
    }

    tracing::info!("Reading sources from '{}'", cfg.input_dir.display());

    let use_case = PrepareUseCase::new(cfg)
        .dry_run(args.dry_run)
        .quiet(args.quiet);
    let manifest = use_case.execute()?;

    print_summary(&manifest, args.dry_run);
    Ok(())
}

fn print_summary(manifest: &RunManifest, dry_run: bool) {
    let verb = if dry_run { "would write" } else { "wrote" };

    if let Some(all) = &manifest.all {
        println!("{verb} {} ({} lines)", all.sink, all.lines_written);
    }
    for fold in &manifest.folds {
        println!(
            "fold {:>3}: test={} -> {} ({} lines), train -> {} ({} lines)",
            fold.index,
            fold.held_out,
            fold.test.sink,
            fold.test.lines_written,
            fold.train.sink,
            fold.train.lines_written,
        );
    }
    println!("Done: {} sources, {} folds.", manifest.sources.len(), manifest.folds.len());
}

fn run_check(args: SourceArgs) -> Result<()> {
    let cfg           = args.to_config()?;
    let header_length = cfg.header_length;
    let reports       = InspectUseCase::new(cfg).check()?;

    let mut unreadable = 0;
    for r in &reports {
        match &r.error {
            Some(e) => {
                unreadable += 1;
                println!("FAIL  {}: {}", r.name, e);
            }
            None => {
                let note = if r.is_header_only(header_length) { "  (no data lines)" } else { "" };
                println!(
                    "ok    {} [{} lines]{}\n      {}",
                    r.name,
                    r.line_count,
                    note,
                    r.first_line.as_deref().unwrap_or("<empty>"),
                );
            }
        }
    }

    if unreadable > 0 {
        bail!("{} of {} sources could not be read", unreadable, reports.len());
    }
    Ok(())
}

fn run_plan(args: SourceArgs) -> Result<()> {
    let rows = InspectUseCase::new(args.to_config()?).plan()?;
    for row in &rows {
        println!(
            "{:>3}: {} / {}  test={}  train={}",
            row.index,
            row.train,
            row.test,
            row.held_out,
            row.pooled.join(", "),
        );
    }
    Ok(())
}
