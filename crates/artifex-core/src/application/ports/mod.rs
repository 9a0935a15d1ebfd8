//! Driven (output) ports - implemented by infrastructure.
//!
//! The engine's only physical interface is the filesystem under the target
//! directory. The `artifex-adapters` crate provides the implementations:
//! `LocalFilesystem` for production and `MemoryFilesystem` for tests.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// A failed filesystem operation, with the path it failed on.
///
/// The engine does not distinguish filesystem failures from other
/// per-element generation failures; there is no retry policy, the unit of
/// recovery is rerunning the whole generation.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("filesystem error at {}: {reason}", path.display())]
pub struct FilesystemError {
    pub path: PathBuf,
    pub reason: String,
}

impl FilesystemError {
    pub fn new(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Port for filesystem operations under a generation target directory.
///
/// The orchestrator owns the target directory exclusively for the duration of
/// a run; concurrent external writers are a documented hazard, not a
/// supported case.
pub trait Filesystem: Send + Sync {
    /// Enumerate every file and directory under `root`, recursively, not
    /// including `root` itself. A missing root yields an empty list.
    fn walk(&self, root: &Path) -> Result<Vec<PathBuf>, FilesystemError>;

    /// Read a file's content; `None` if no file exists at the path.
    fn read_file(&self, path: &Path) -> Result<Option<String>, FilesystemError>;

    /// Write content to a file, replacing any existing content.
    fn write_file(&self, path: &Path, content: &str) -> Result<(), FilesystemError>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> Result<(), FilesystemError>;

    /// Whether the path currently names a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Whether the directory currently has no entries.
    fn dir_is_empty(&self, path: &Path) -> Result<bool, FilesystemError>;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> Result<(), FilesystemError>;

    /// Remove an empty directory.
    fn remove_dir(&self, path: &Path) -> Result<(), FilesystemError>;
}
