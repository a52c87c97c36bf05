//! Run orchestration shared by the CLI and dry runs.
//!
//! ```text
//! Idle ──load──▶ ConfigLoaded ──mirror──▶ Mirrored ──walk──▶ Rendering ──▶ Done
//!                     │                       │
//!                     └──── source missing ───┴──── I/O failure ──▶ Failed
//! ```
//!
//! Configuration errors return before any filesystem access and leave the
//! pipeline `Idle`. Per-file render failures never move it to `Failed`.

use std::fmt;
use std::path::PathBuf;

use templater_core::{Config, ConfigSource};
use templater_renderer::{RenderSettings, Renderer};

use crate::error::SyncError;
use crate::fs::FileSystemPort;
use crate::mirror::{mirror, MirrorSummary};
use crate::render::{render_tree, RenderReport};

/// Lifecycle of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    ConfigLoaded,
    Mirrored,
    Rendering,
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunState::Idle => "idle",
            RunState::ConfigLoaded => "config-loaded",
            RunState::Mirrored => "mirrored",
            RunState::Rendering => "rendering",
            RunState::Done => "done",
            RunState::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Summary of a run that reached [`RunState::Done`].
#[derive(Debug)]
pub struct RunReport {
    pub source: PathBuf,
    pub target: PathBuf,
    pub mirror: MirrorSummary,
    pub render: RenderReport,
}

/// Wires configuration, mirror, and renderer together over one filesystem.
pub struct Pipeline<'a, F: FileSystemPort + ?Sized> {
    fs: &'a F,
    settings: RenderSettings,
    state: RunState,
}

impl<'a, F: FileSystemPort + ?Sized> Pipeline<'a, F> {
    pub fn new(fs: &'a F, settings: RenderSettings) -> Self {
        Pipeline {
            fs,
            settings,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    fn advance(&mut self, next: RunState) {
        tracing::debug!("run state: {} -> {}", self.state, next);
        self.state = next;
    }

    fn fail(&mut self, err: SyncError) -> SyncError {
        self.advance(RunState::Failed);
        err
    }

    /// Load configuration from `source`, then run.
    pub fn run(&mut self, source: &dyn ConfigSource) -> Result<RunReport, SyncError> {
        let config = source.load()?;
        self.run_config(&config)
    }

    /// Run with an already-validated configuration.
    pub fn run_config(&mut self, config: &Config) -> Result<RunReport, SyncError> {
        self.advance(RunState::ConfigLoaded);
        let source = config.resolved_source();
        let target = config.resolved_target();
        tracing::debug!(
            "source folder {}, target folder {}, {} parameter(s)",
            source.display(),
            target.display(),
            config.parameters.len()
        );

        let mirror_summary = match mirror(self.fs, &source, &target) {
            Ok(summary) => summary,
            Err(err) => return Err(self.fail(err)),
        };
        self.advance(RunState::Mirrored);

        self.advance(RunState::Rendering);
        let renderer = Renderer::new(&config.parameters, &self.settings);
        let render = match render_tree(self.fs, &target, &renderer) {
            Ok(report) => report,
            Err(err) => return Err(self.fail(err)),
        };

        self.advance(RunState::Done);
        Ok(RunReport {
            source,
            target,
            mirror: mirror_summary,
            render,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use templater_core::{ConfigError, ParameterSet};

    use super::*;
    use crate::memory::MemoryFileSystem;

    fn config(source: &str, target: &str) -> Config {
        let params = ParameterSet::new([("project", "demo")]).unwrap();
        Config::new(source, target, params, "/w")
    }

    struct BrokenSource;

    impl ConfigSource for BrokenSource {
        fn load(&self) -> Result<Config, ConfigError> {
            Err(ConfigError::EmptyParameters)
        }
    }

    #[test]
    fn successful_run_reaches_done() {
        let mem = MemoryFileSystem::new();
        mem.add_file("/w/src/${project}.md.ftl", "# ${project}").unwrap();
        let mut pipeline = Pipeline::new(&mem, RenderSettings::default());

        let report = pipeline.run(&config("src", "out")).unwrap();

        assert_eq!(pipeline.state(), RunState::Done);
        assert_eq!(report.target, Path::new("/w/out"));
        assert_eq!(mem.file_string("/w/out/demo.md").as_deref(), Some("# demo"));
    }

    #[test]
    fn per_file_failures_still_reach_done() {
        let mem = MemoryFileSystem::new();
        mem.add_file("/w/src/bad.ftl", "${nope}").unwrap();
        let mut pipeline = Pipeline::new(&mem, RenderSettings::default());

        let report = pipeline.run(&config("src", "out")).unwrap();

        assert_eq!(pipeline.state(), RunState::Done);
        assert_eq!(report.render.failures.len(), 1);
    }

    #[test]
    fn missing_source_fails_the_run() {
        let mem = MemoryFileSystem::new();
        let mut pipeline = Pipeline::new(&mem, RenderSettings::default());

        let err = pipeline.run(&config("src", "out")).unwrap_err();

        assert!(matches!(err, SyncError::SourceMissing { .. }));
        assert_eq!(pipeline.state(), RunState::Failed);
        assert!(!mem.exists(Path::new("/w/out")));
    }

    #[test]
    fn config_error_leaves_pipeline_idle() {
        let mem = MemoryFileSystem::new();
        let mut pipeline = Pipeline::new(&mem, RenderSettings::default());

        let err = pipeline.run(&BrokenSource).unwrap_err();

        assert!(matches!(err, SyncError::Config(_)));
        assert_eq!(pipeline.state(), RunState::Idle);
    }

    #[test]
    fn custom_marker_suffix_is_honoured() {
        let mem = MemoryFileSystem::new();
        mem.add_file("/w/src/a.txt.tpl", "${project}").unwrap();
        mem.add_file("/w/src/b.txt.ftl", "${project}").unwrap();
        let mut pipeline = Pipeline::new(&mem, RenderSettings::with_marker_suffix(".tpl"));

        pipeline.run(&config("src", "out")).unwrap();

        assert_eq!(mem.file_string("/w/out/a.txt").as_deref(), Some("demo"));
        assert_eq!(mem.file_string("/w/out/b.txt.ftl").as_deref(), Some("${project}"));
    }
}
