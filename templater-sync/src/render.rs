//! File renderer: turn every marker file in the mirrored tree into its output.
//!
//! ## Per-marker protocol
//!
//! 1. Relative path inside the target root (template identity in errors).
//! 2. Read + decode as UTF-8.
//! 3. Render the full content in memory.
//! 4. Derive the output name from the leaf file name.
//! 5. Write the output next to the marker.
//! 6. Delete the marker.
//!
//! A failure at any step is recorded for that file and the walk moves on.
//! Failing before step 5 leaves no output behind; failing at step 6 leaves
//! both the output and the marker.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use templater_renderer::Renderer;

use crate::error::{FailureCause, RenderFailure, SyncError};
use crate::fs::FileSystemPort;

/// One successfully rendered marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// Absolute path of the (now deleted) marker.
    pub template: PathBuf,
    /// Absolute path of the written output.
    pub output: PathBuf,
    /// Output path relative to the target root, `/`-separated.
    pub relative_output: String,
    /// `true` if a file already existed at `output` and was replaced.
    pub replaced: bool,
}

/// Outcome of a render pass.
#[derive(Debug, Default)]
pub struct RenderReport {
    pub rendered: Vec<RenderedFile>,
    pub failures: Vec<RenderFailure>,
    /// Files without the marker suffix, left exactly as mirrored.
    pub untouched: usize,
}

impl RenderReport {
    /// `true` when no marker failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// `/`-separated path of `path` relative to `root`.
pub(crate) fn relative_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

/// Render every marker file under `root`.
///
/// Only listing the tree is fatal; per-file problems land in
/// [`RenderReport::failures`].
pub fn render_tree<F: FileSystemPort + ?Sized>(
    fs: &F,
    root: &Path,
    renderer: &Renderer<'_>,
) -> Result<RenderReport, SyncError> {
    // Snapshot before mutating: outputs and deletions must not disturb the walk.
    let files = fs.list_files(root).map_err(|e| SyncError::Walk {
        path: e.path,
        source: e.source,
    })?;

    let settings = renderer.settings();
    let mut report = RenderReport::default();
    let mut produced: HashSet<PathBuf> = HashSet::new();

    for path in files {
        let is_marker = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| settings.is_marker(n));
        if !is_marker {
            report.untouched += 1;
            continue;
        }

        let relative = relative_name(root, &path);
        tracing::debug!("rendering {relative}");
        match render_marker(fs, root, &path, &relative, renderer) {
            Ok(file) => {
                if !produced.insert(file.output.clone()) {
                    tracing::warn!(
                        "{} overwrote the output of an earlier template",
                        file.relative_output
                    );
                } else if file.replaced {
                    tracing::warn!("{} replaced a mirrored file", file.relative_output);
                }
                tracing::info!("wrote {}", file.output.display());
                report.rendered.push(file);
            }
            Err(cause) => {
                let failure = RenderFailure {
                    template: path,
                    relative,
                    cause,
                };
                tracing::warn!("{failure}");
                report.failures.push(failure);
            }
        }
    }

    Ok(report)
}

fn render_marker<F: FileSystemPort + ?Sized>(
    fs: &F,
    root: &Path,
    path: &Path,
    relative: &str,
    renderer: &Renderer<'_>,
) -> Result<RenderedFile, FailureCause> {
    let bytes = fs.read(path).map_err(|e| FailureCause::Read(e.source))?;
    let text = String::from_utf8(bytes).map_err(FailureCause::InvalidEncoding)?;
    let content = renderer.render_content(relative, &text)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let output_name = renderer.output_name(&file_name)?;
    let output = path.with_file_name(&output_name);

    let replaced = fs.exists(&output);
    fs.write(&output, content.as_bytes())
        .map_err(|e| FailureCause::Write {
            path: e.path,
            source: e.source,
        })?;

    // Output names never carry the marker suffix, so `output` differs from `path`.
    fs.remove_file(path).map_err(|e| FailureCause::Delete {
        output: output.clone(),
        source: e.source,
    })?;

    Ok(RenderedFile {
        template: path.to_path_buf(),
        relative_output: relative_name(root, &output),
        output,
        replaced,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryFileSystem;
    use templater_core::ParameterSet;
    use templater_renderer::{RenderError, RenderSettings};

    fn params() -> ParameterSet {
        ParameterSet::new([("project", "example-project"), ("author", "Lucas")]).unwrap()
    }

    fn run(mem: &MemoryFileSystem) -> RenderReport {
        let p = params();
        let settings = RenderSettings::default();
        render_tree(mem, Path::new("/t"), &Renderer::new(&p, &settings)).unwrap()
    }

    #[test]
    fn renders_content_and_name_then_removes_marker() {
        let mem = MemoryFileSystem::new();
        mem.add_file("/t/sub/${project}-file.txt.ftl", "${project} by ${author}\n")
            .unwrap();

        let report = run(&mem);

        assert!(report.is_clean());
        assert_eq!(report.rendered.len(), 1);
        assert_eq!(report.rendered[0].relative_output, "sub/example-project-file.txt");
        assert_eq!(
            mem.file_string("/t/sub/example-project-file.txt").as_deref(),
            Some("example-project by Lucas\n")
        );
        assert!(!mem.exists(Path::new("/t/sub/${project}-file.txt.ftl")));
    }

    #[test]
    fn non_markers_are_untouched() {
        let mem = MemoryFileSystem::new();
        mem.add_file("/t/static.txt", "${project} stays").unwrap();

        let report = run(&mem);

        assert_eq!(report.untouched, 1);
        assert!(report.rendered.is_empty());
        assert_eq!(mem.file_string("/t/static.txt").as_deref(), Some("${project} stays"));
    }

    #[test]
    fn one_failure_does_not_stop_siblings() {
        let mem = MemoryFileSystem::new();
        mem.add_file("/t/a.txt.ftl", "${project}").unwrap();
        mem.add_file("/t/b.txt.ftl", "${undefined}").unwrap();
        mem.add_file("/t/c.txt.ftl", "${author}").unwrap();

        let report = run(&mem);

        assert_eq!(report.rendered.len(), 2);
        assert_eq!(report.failures.len(), 1);
        let failure = &report.failures[0];
        assert_eq!(failure.relative, "b.txt.ftl");
        assert!(matches!(
            failure.cause,
            FailureCause::Render(RenderError::UndefinedParameter { .. })
        ));
        assert_eq!(mem.file_string("/t/a.txt").as_deref(), Some("example-project"));
        assert_eq!(mem.file_string("/t/c.txt").as_deref(), Some("Lucas"));
        assert!(!mem.exists(Path::new("/t/b.txt")), "no partial output");
        assert!(mem.exists(Path::new("/t/b.txt.ftl")), "failed marker stays");
    }

    #[test]
    fn invalid_utf8_is_a_per_file_failure() {
        let mem = MemoryFileSystem::new();
        mem.add_file("/t/bin.dat.ftl", vec![0xff, 0xfe, 0x00]).unwrap();

        let report = run(&mem);

        assert!(matches!(report.failures[0].cause, FailureCause::InvalidEncoding(_)));
    }

    #[test]
    fn delete_failure_keeps_output_and_marker() {
        let mem = MemoryFileSystem::new();
        mem.add_file("/t/x.txt.ftl", "${project}").unwrap();
        mem.protect("/t/x.txt.ftl");

        let report = run(&mem);

        assert!(matches!(report.failures[0].cause, FailureCause::Delete { .. }));
        assert_eq!(mem.file_string("/t/x.txt").as_deref(), Some("example-project"));
        assert!(mem.exists(Path::new("/t/x.txt.ftl")));
    }

    #[test]
    fn output_replacing_mirrored_file_is_flagged() {
        let mem = MemoryFileSystem::new();
        mem.add_file("/t/readme.md", "old").unwrap();
        mem.add_file("/t/readme.md.ftl", "new ${project}").unwrap();

        let report = run(&mem);

        assert!(report.rendered[0].replaced);
        assert_eq!(mem.file_string("/t/readme.md").as_deref(), Some("new example-project"));
    }

    #[test]
    fn name_rendering_to_a_marker_keeps_the_marker_and_fails() {
        let mem = MemoryFileSystem::new();
        mem.add_file("/t/notes.ftl.ftl", "${project}").unwrap();

        let report = run(&mem);

        assert!(report.rendered.is_empty());
        assert!(matches!(
            report.failures[0].cause,
            FailureCause::Render(RenderError::InvalidOutputName { .. })
        ));
        assert!(!mem.exists(Path::new("/t/notes.ftl")));
        assert!(mem.exists(Path::new("/t/notes.ftl.ftl")));
    }

    #[test]
    fn walk_failure_is_fatal() {
        let mem = MemoryFileSystem::new();
        let p = params();
        let settings = RenderSettings::default();
        let err = render_tree(&mem, Path::new("/missing"), &Renderer::new(&p, &settings))
            .unwrap_err();
        assert!(matches!(err, SyncError::Walk { .. }));
    }
}
