//! Tree mirror. Destructively rebuild the target as a copy of the source.
//!
//! 1. Source must exist and be a directory (`SourceMissing`).
//! 2. Source must not equal or sit inside the target (`OverlappingFolders`);
//!    checked before anything is deleted. A target inside the source is fine.
//! 3. Existing target: remove its children. Missing target: create it.
//! 4. Copy every file and directory, overwriting on conflict. A target nested
//!    in the source is skipped by the copy.
//!
//! Running it twice with the same source leaves the same target.

use std::path::{Component, Path, PathBuf};

use crate::error::{mirror_err, SyncError};
use crate::fs::{CopyStats, FileSystemPort};

/// What a mirror pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorSummary {
    /// `true` when an existing target had its children removed.
    pub cleaned: bool,
    pub copied: CopyStats,
}

/// Lexically normalise `.` and `..` so overlap checks see through them.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Cleaning `target` would destroy `source`.
fn source_within_target(source: &Path, target: &Path) -> bool {
    source.starts_with(target)
}

/// Mirror `source` into `target`. Both paths must be absolute.
pub fn mirror<F: FileSystemPort + ?Sized>(
    fs: &F,
    source: &Path,
    target: &Path,
) -> Result<MirrorSummary, SyncError> {
    let source = &normalize(source);
    let target = &normalize(target);
    if !fs.is_dir(source) {
        return Err(SyncError::SourceMissing {
            path: source.to_path_buf(),
        });
    }
    if source_within_target(source, target) {
        return Err(SyncError::OverlappingFolders {
            source_folder: source.to_path_buf(),
            target_folder: target.to_path_buf(),
        });
    }

    let cleaned = if fs.exists(target) {
        tracing::debug!("cleaning target folder {}", target.display());
        fs.clean_dir(target).map_err(|e| mirror_err(e.path, e.source))?;
        true
    } else {
        tracing::debug!("creating target folder {}", target.display());
        fs.create_dir_all(target).map_err(|e| mirror_err(e.path, e.source))?;
        false
    };

    let copied = fs
        .copy_tree(source, target)
        .map_err(|e| mirror_err(e.path, e.source))?;
    tracing::info!(
        "mirrored {} file(s) and {} folder(s) from {} to {}",
        copied.files,
        copied.dirs,
        source.display(),
        target.display()
    );

    Ok(MirrorSummary { cleaned, copied })
}
