//! Filesystem port: the narrow capability set the mirror and renderer need.
//!
//! [`OsFileSystem`] talks to the real disk. [`crate::memory::MemoryFileSystem`]
//! implements the same contract in memory for tests and dry runs.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use filetime::FileTime;
use tempfile::NamedTempFile;
use thiserror::Error;
use walkdir::WalkDir;

/// An I/O failure annotated with the path it happened at.
#[derive(Debug, Error)]
#[error("{}: {source}", .path.display())]
pub struct FsError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

pub(crate) fn fs_err(path: impl Into<PathBuf>, source: io::Error) -> FsError {
    FsError {
        path: path.into(),
        source,
    }
}

/// Counts reported by [`FileSystemPort::copy_tree`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files: usize,
    pub dirs: usize,
}

/// File-system side effects used by the engine. Every path is absolute.
pub trait FileSystemPort {
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn read(&self, path: &Path) -> Result<Vec<u8>, FsError>;

    /// Create or replace the file at `path`. The parent must exist.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), FsError>;

    fn remove_file(&self, path: &Path) -> Result<(), FsError>;

    fn create_dir_all(&self, path: &Path) -> Result<(), FsError>;

    /// Delete every child of `path`, keeping `path` itself.
    fn clean_dir(&self, path: &Path) -> Result<(), FsError>;

    /// Copy the contents of `source` into the existing directory `target`,
    /// overwriting files that already exist. When `target` lies inside
    /// `source`, that subtree is not copied.
    fn copy_tree(&self, source: &Path, target: &Path) -> Result<CopyStats, FsError>;

    /// Every regular file under `root`, depth-first with siblings sorted by name.
    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>, FsError>;
}

// ---------------------------------------------------------------------------
// OsFileSystem
// ---------------------------------------------------------------------------

/// [`FileSystemPort`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

fn walk_err(root: &Path, err: walkdir::Error) -> FsError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
    fs_err(path, io::Error::from(err))
}

/// Copy access and modification times. Best-effort: not every platform or
/// filesystem allows it.
fn preserve_times(meta: &std::fs::Metadata, dest: &Path) {
    let atime = FileTime::from_last_access_time(meta);
    let mtime = FileTime::from_last_modification_time(meta);
    if let Err(e) = filetime::set_file_times(dest, atime, mtime) {
        tracing::debug!("could not preserve times on {}: {e}", dest.display());
    }
}

impl FileSystemPort for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, FsError> {
        std::fs::read(path).map_err(|e| fs_err(path, e))
    }

    /// Writes a uniquely named temp file next to `path`, then renames it over
    /// `path`. The temp file is removed if any step fails.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), FsError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| fs_err(dir, e))?;
        tmp.write_all(contents).map_err(|e| fs_err(tmp.path(), e))?;
        tmp.persist(path).map_err(|e| fs_err(path, e.error))?;
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<(), FsError> {
        std::fs::remove_file(path).map_err(|e| fs_err(path, e))
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), FsError> {
        std::fs::create_dir_all(path).map_err(|e| fs_err(path, e))
    }

    fn clean_dir(&self, path: &Path) -> Result<(), FsError> {
        let entries = std::fs::read_dir(path).map_err(|e| fs_err(path, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| fs_err(path, e))?;
            let child = entry.path();
            // file_type() does not follow symlinks: a link to a directory is
            // removed as a file, never recursed into.
            let file_type = entry.file_type().map_err(|e| fs_err(&child, e))?;
            if file_type.is_dir() {
                std::fs::remove_dir_all(&child).map_err(|e| fs_err(&child, e))?;
            } else {
                std::fs::remove_file(&child).map_err(|e| fs_err(&child, e))?;
            }
        }
        Ok(())
    }

    fn copy_tree(&self, source: &Path, target: &Path) -> Result<CopyStats, FsError> {
        let mut stats = CopyStats::default();
        let mut dirs: Vec<(std::fs::Metadata, PathBuf)> = Vec::new();

        let walker = WalkDir::new(source)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.path() != target);
        for entry in walker {
            let entry = entry.map_err(|e| walk_err(source, e))?;
            let rel = entry.path().strip_prefix(source).map_err(|_| {
                fs_err(entry.path(), io::Error::other("entry escaped the source root"))
            })?;
            let dest = target.join(rel);
            let meta = entry.metadata().map_err(|e| walk_err(source, e))?;

            if meta.is_dir() {
                std::fs::create_dir_all(&dest).map_err(|e| fs_err(&dest, e))?;
                if entry.depth() > 0 {
                    stats.dirs += 1;
                }
                dirs.push((meta, dest));
            } else if meta.is_file() {
                std::fs::copy(entry.path(), &dest).map_err(|e| fs_err(&dest, e))?;
                preserve_times(&meta, &dest);
                stats.files += 1;
            } else {
                tracing::warn!("skipping special file {}", entry.path().display());
            }
        }

        // Children first: creating files inside a directory bumps its mtime.
        for (meta, dest) in dirs.iter().rev() {
            preserve_times(meta, dest);
        }
        Ok(stats)
    }

    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>, FsError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| walk_err(root, e))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
