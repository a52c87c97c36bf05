//! `templater [--config <path>] [--verbose] [--dry-run]`: mirror and render.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use templater_core::{Config, ConfigSource, FileConfigSource};
use templater_renderer::RenderSettings;
use templater_sync::{FileSystemPort, MemoryFileSystem, OsFileSystem, Pipeline, RunReport};

/// Used when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "config.json";

/// Arguments for a render run.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Path to the JSON (or .yaml/.yml) configuration file [default: config.json].
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log every step and print full error chains.
    #[arg(long)]
    pub verbose: bool,

    /// Render into memory and report what would be written; the target folder is left untouched.
    #[arg(long)]
    pub dry_run: bool,
}

impl RenderArgs {
    pub fn run(self) -> Result<()> {
        let config_path = match self.config {
            Some(path) => path,
            None => {
                tracing::info!("using default value for --config: {DEFAULT_CONFIG}");
                PathBuf::from(DEFAULT_CONFIG)
            }
        };

        let config = FileConfigSource::new(&config_path)
            .load()
            .with_context(|| {
                format!("could not load configuration file {}", config_path.display())
            })?;
        tracing::debug!("loaded configuration: {config:?}");

        let settings = RenderSettings::default();
        let report = if self.dry_run {
            let source = config.resolved_source();
            // A missing source is reported by the pipeline, not the snapshot.
            let mem = if source.is_dir() {
                MemoryFileSystem::snapshot(&source)
                    .with_context(|| format!("could not read {}", source.display()))?
            } else {
                MemoryFileSystem::new()
            };
            process(&mem, settings, &config)?
        } else {
            process(&OsFileSystem, settings, &config)?
        };

        print_report(&report, self.dry_run);
        Ok(())
    }
}

fn process<F: FileSystemPort + ?Sized>(
    fs: &F,
    settings: RenderSettings,
    config: &Config,
) -> Result<RunReport> {
    Pipeline::new(fs, settings)
        .run_config(config)
        .context("could not process templates")
}

fn print_report(report: &RunReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let marker = if dry_run { "~" } else { "✎" };

    for file in &report.render.rendered {
        println!("  {marker}  {}", file.relative_output);
    }
    for failure in &report.render.failures {
        eprintln!("  {}  {}: {}", "✗".red().bold(), failure.relative, failure.cause);
    }

    let rendered = report.render.rendered.len();
    let failed = report.render.failures.len();
    let status = if failed == 0 {
        "✓".green().bold()
    } else {
        "!".yellow().bold()
    };
    println!(
        "{prefix}{status} Done! {} → {} ({rendered} rendered, {failed} failed, {} copied as-is)",
        report.source.display(),
        report.target.display(),
        report.render.untouched,
    );
}
