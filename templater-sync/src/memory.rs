//! In-memory [`FileSystemPort`] used by unit tests and `--dry-run`.
//!
//! Paths are stored as given, so callers should use absolute paths
//! consistently. The `BTreeMap` key order on `PathBuf` compares component
//! by component, which yields the same depth-first, name-sorted walk order
//! as [`crate::fs::OsFileSystem::list_files`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::fs::{fs_err, CopyStats, FileSystemPort, FsError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Dir,
    File(Vec<u8>),
}

/// A whole directory tree held in memory.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    nodes: RefCell<BTreeMap<PathBuf, Node>>,
    protected: RefCell<Vec<PathBuf>>,
}

fn not_found(path: &Path) -> FsError {
    fs_err(path, io::Error::new(io::ErrorKind::NotFound, "no such file or directory"))
}

fn not_a_directory(path: &Path) -> FsError {
    fs_err(path, io::Error::other("not a directory"))
}

fn is_a_directory(path: &Path) -> FsError {
    fs_err(path, io::Error::other("is a directory"))
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the real directory `root` (and its ancestors, as empty
    /// directories) into a new in-memory filesystem.
    pub fn snapshot(root: &Path) -> Result<Self, FsError> {
        let mem = MemoryFileSystem::new();
        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                fs_err(path, io::Error::from(e))
            })?;
            if entry.file_type().is_dir() {
                mem.create_dir_all(entry.path())?;
            } else if entry.file_type().is_file() {
                let contents = std::fs::read(entry.path()).map_err(|e| fs_err(entry.path(), e))?;
                mem.add_file(entry.path(), contents)?;
            }
        }
        Ok(mem)
    }

    /// Create `path` with `contents`, creating parent directories as needed.
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> Result<(), FsError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }
        self.write(path, &contents.into())
    }

    /// Make every write and removal at or below `path` fail with `PermissionDenied`.
    pub fn protect(&self, path: impl Into<PathBuf>) {
        self.protected.borrow_mut().push(path.into());
    }

    /// Contents of the file at `path`, if it is a file.
    pub fn file(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        match self.nodes.borrow().get(path.as_ref()) {
            Some(Node::File(data)) => Some(data.clone()),
            _ => None,
        }
    }

    /// UTF-8 contents of the file at `path`.
    pub fn file_string(&self, path: impl AsRef<Path>) -> Option<String> {
        self.file(path).and_then(|data| String::from_utf8(data).ok())
    }

    fn check_writable(&self, path: &Path) -> Result<(), FsError> {
        if self.protected.borrow().iter().any(|p| path.starts_with(p)) {
            return Err(fs_err(
                path,
                io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
            ));
        }
        Ok(())
    }

    fn children_of(&self, root: &Path) -> Vec<(PathBuf, Node)> {
        self.nodes
            .borrow()
            .iter()
            .filter(|(p, _)| p.as_path() != root && p.starts_with(root))
            .map(|(p, n)| (p.clone(), n.clone()))
            .collect()
    }
}

impl FileSystemPort for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.nodes.borrow().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.nodes.borrow().get(path), Some(Node::Dir))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, FsError> {
        match self.nodes.borrow().get(path) {
            Some(Node::File(data)) => Ok(data.clone()),
            Some(Node::Dir) => Err(is_a_directory(path)),
            None => Err(not_found(path)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), FsError> {
        self.check_writable(path)?;
        let mut nodes = self.nodes.borrow_mut();
        match path.parent().map(|p| nodes.get(p)) {
            Some(Some(Node::Dir)) => {}
            Some(Some(Node::File(_))) => return Err(not_a_directory(path)),
            _ => return Err(not_found(path)),
        }
        if let Some(Node::Dir) = nodes.get(path) {
            return Err(is_a_directory(path));
        }
        nodes.insert(path.to_path_buf(), Node::File(contents.to_vec()));
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<(), FsError> {
        self.check_writable(path)?;
        let mut nodes = self.nodes.borrow_mut();
        match nodes.get(path) {
            Some(Node::File(_)) => {
                nodes.remove(path);
                Ok(())
            }
            Some(Node::Dir) => Err(is_a_directory(path)),
            None => Err(not_found(path)),
        }
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), FsError> {
        let mut nodes = self.nodes.borrow_mut();
        let ancestors: Vec<&Path> = path
            .ancestors()
            .filter(|a| !a.as_os_str().is_empty())
            .collect();
        for dir in ancestors.into_iter().rev() {
            match nodes.get(dir) {
                Some(Node::Dir) => {}
                Some(Node::File(_)) => return Err(not_a_directory(dir)),
                None => {
                    nodes.insert(dir.to_path_buf(), Node::Dir);
                }
            }
        }
        Ok(())
    }

    fn clean_dir(&self, path: &Path) -> Result<(), FsError> {
        if !self.is_dir(path) {
            return Err(not_found(path));
        }
        let children = self.children_of(path);
        for (child, _) in &children {
            self.check_writable(child)?;
        }
        let mut nodes = self.nodes.borrow_mut();
        for (child, _) in children {
            nodes.remove(&child);
        }
        Ok(())
    }

    fn copy_tree(&self, source: &Path, target: &Path) -> Result<CopyStats, FsError> {
        if !self.is_dir(source) {
            return Err(not_found(source));
        }
        if !self.is_dir(target) {
            return Err(not_found(target));
        }
        let mut stats = CopyStats::default();
        for (path, node) in self.children_of(source) {
            if path.starts_with(target) {
                continue;
            }
            let rel = path.strip_prefix(source).map_err(|_| not_found(&path))?;
            let dest = target.join(rel);
            match node {
                Node::Dir => {
                    self.create_dir_all(&dest)?;
                    stats.dirs += 1;
                }
                Node::File(data) => {
                    self.write(&dest, &data)?;
                    stats.files += 1;
                }
            }
        }
        Ok(stats)
    }

    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>, FsError> {
        if !self.is_dir(root) {
            return Err(not_found(root));
        }
        Ok(self
            .children_of(root)
            .into_iter()
            .filter(|(_, node)| matches!(node, Node::File(_)))
            .map(|(path, _)| path)
            .collect())
    }
}
