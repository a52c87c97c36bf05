//! Error types for templater-sync.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use templater_core::ConfigError;
use templater_renderer::RenderError;

/// Fatal errors: any of these halts the run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration could not be loaded or validated.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Source folder is absent or not a directory.
    #[error("source folder does not exist: {path}")]
    SourceMissing { path: PathBuf },

    /// Source is the target folder or sits inside it.
    #[error("source folder {source_folder} lies within target folder {target_folder}")]
    OverlappingFolders {
        source_folder: PathBuf,
        target_folder: PathBuf,
    },

    /// Clean / create / copy failure while mirroring.
    #[error("mirror failed at {path}: {source}")]
    Mirror {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The mirrored tree could not be listed before rendering.
    #[error("could not walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Mirror`].
pub(crate) fn mirror_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Mirror {
        path: path.into(),
        source,
    }
}

/// Why a single marker file could not be rendered.
#[derive(Debug, Error)]
pub enum FailureCause {
    #[error("read failed: {0}")]
    Read(#[source] std::io::Error),

    #[error("not valid UTF-8: {0}")]
    InvalidEncoding(#[source] std::string::FromUtf8Error),

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("write to {path} failed: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output was written but the marker could not be removed.
    #[error("output written to {output} but marker could not be deleted: {source}")]
    Delete {
        output: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Isolated per-file failure; collected, never fatal.
#[derive(Debug)]
pub struct RenderFailure {
    /// Absolute path of the marker file.
    pub template: PathBuf,
    /// Path relative to the target root.
    pub relative: String,
    pub cause: FailureCause,
}

impl fmt::Display for RenderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error processing file {}: {}", self.template.display(), self.cause)
    }
}

impl std::error::Error for RenderFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}
