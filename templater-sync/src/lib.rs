//! # templater-sync
//!
//! Mirrors a source tree into a target folder and renders every marker file
//! in the copy.
//!
//! Call [`pipeline::Pipeline::run`] with a [`templater_core::ConfigSource`]
//! for the whole flow, or use [`mirror::mirror`] and [`render::render_tree`]
//! directly. Every filesystem side effect goes through [`FileSystemPort`],
//! so the same code runs against disk ([`OsFileSystem`]) or memory
//! ([`MemoryFileSystem`]).

pub mod error;
pub mod fs;
pub mod memory;
pub mod mirror;
pub mod pipeline;
pub mod render;

pub use error::{FailureCause, RenderFailure, SyncError};
pub use fs::{CopyStats, FileSystemPort, FsError, OsFileSystem};
pub use memory::MemoryFileSystem;
pub use mirror::{mirror, MirrorSummary};
pub use pipeline::{Pipeline, RunReport, RunState};
pub use render::{render_tree, RenderReport, RenderedFile};
