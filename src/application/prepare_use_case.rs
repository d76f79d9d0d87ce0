// ============================================================
// Layer 2 — PrepareUseCase
// ============================================================
// Orchestrates a full run in order:
//
//   Step 1: Resolve sources            (Layer 2 - config)
//   Step 2: Preflight check            (Layer 4 - data)
//   Step 3: Open the sink factory      (Layer 6 - infra)
//   Step 4: Write the All file         (Layer 4 - data)
//   Step 5: Write every fold           (Layer 4 - data)
//   Step 6: Save the run manifest      (Layer 6 - infra)
//
// Steps 4 and 5 can be switched off through `write_all` and
// `write_folds`. When a fold fails the run stops, unless
// `keep_going` is set: then the failure is logged, the
// remaining folds still run and the run ends with an error
// listing every failed plan index.

use anyhow::{bail, Result};

use crate::application::config::PrepareConfig;
use crate::data::{
    loader::check_sources,
    merger::LineMerger,
    planner::LeaveOneOutPlanner,
};
use crate::domain::sink::SinkTarget;
use crate::domain::traits::{LineSource, ProgressReporter, SinkFactory};
use crate::infra::{
    file_sink::{DryRunSinks, FileSinks},
    manifest::RunManifest,
    reporter::{SilentReporter, TracingReporter},
};

pub struct PrepareUseCase {
    config:  PrepareConfig,
    dry_run: bool,
    quiet:   bool,
}

impl PrepareUseCase {
    pub fn new(config: PrepareConfig) -> Self {
        Self { config, dry_run: false, quiet: false }
    }

    /// Count lines and report progress without writing any file.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Skip the per-source and per-fold progress lines.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Execute the run against the file system.
    pub fn execute(&self) -> Result<RunManifest> {
        let cfg = &self.config;

        // ── Step 1: Resolve sources ──────────────────────────────────────────
        let sources = cfg.resolve_sources()?;
        tracing::info!(
            "Preparing {} sources from '{}' (header: {} lines, rotation: {})",
            sources.len(),
            cfg.input_dir.display(),
            cfg.header_length,
            cfg.rotation
        );

        // ── Step 2: Preflight ────────────────────────────────────────────────
        // Every source must open before anything is written
        let reports = check_sources(&sources, cfg.header_length);
        let broken: Vec<&str> = reports
            .iter()
            .filter(|r| !r.is_readable())
            .map(|r| r.name.as_str())
            .collect();
        if !broken.is_empty() {
            bail!("Cannot read sources: {}", broken.join(", "));
        }

        // ── Steps 3-5: Sinks, All file, folds ────────────────────────────────
        let reporter: &dyn ProgressReporter = if self.quiet {
            &SilentReporter
        } else {
            &TracingReporter
        };
        let manifest = if self.dry_run {
            let mut sinks = DryRunSinks::new(&cfg.output_dir, cfg.naming.clone());
            self.execute_with(&sources, &mut sinks, reporter)?
        } else {
            let mut sinks = FileSinks::new(&cfg.output_dir, cfg.naming.clone())?;
            self.execute_with(&sources, &mut sinks, reporter)?
        };

        // ── Step 6: Manifest ─────────────────────────────────────────────────
        if cfg.manifest && !self.dry_run {
            let path = manifest.save(&cfg.output_dir)?;
            tracing::info!("Run manifest written to '{}'", path.display());
        }

        if !manifest.failed_plans.is_empty() {
            bail!(
                "{} of {} folds failed (plan indices: {:?}); completed outputs were kept",
                manifest.failed_plans.len(),
                sources.len(),
                manifest.failed_plans
            );
        }

        Ok(manifest)
    }

    /// Write the All file and the folds into `sinks`.
    ///
    /// With `keep_going` a failed fold is recorded in the manifest's
    /// `failed_plans` instead of ending the run.
    pub fn execute_with<S, F>(
        &self,
        sources:  &[S],
        sinks:    &mut F,
        reporter: &dyn ProgressReporter,
    ) -> Result<RunManifest>
    where
        S: LineSource,
        F: SinkFactory,
    {
        let cfg    = &self.config;
        let merger = LineMerger::new(cfg.header_length, reporter);
        let mut manifest = RunManifest::new(
            cfg.header_length,
            cfg.rotation,
            sources.iter().map(|s| s.name().to_string()).collect(),
        );

        if cfg.write_all {
            let mut sink = sinks.create(SinkTarget::All)?;
            let stats    = merger.merge(sources, &mut sink)?;
            sink.close()?;
            tracing::info!("All file '{}': {} lines", stats.sink, stats.lines_written);
            manifest.all = Some(stats);
        }

        if cfg.write_folds {
            let planner = LeaveOneOutPlanner::new(cfg.rotation);
            if cfg.keep_going {
                for plan in planner.generate_plans(sources) {
                    match planner.execute_plan(&merger, sources, &plan, sinks) {
                        Ok(outcome) => manifest.folds.push(outcome),
                        Err(e) => {
                            tracing::error!("{e}; continuing with the next fold");
                            manifest.failed_plans.push(e.plan_index().unwrap_or(plan.index()));
                        }
                    }
                }
            } else {
                manifest.folds = planner.execute(&merger, sources, sinks)?;
            }
            tracing::info!("Test file creation complete");
        }

        Ok(manifest)
    }
}
