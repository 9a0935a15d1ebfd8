//! Local filesystem adapter using std::fs and walkdir.

use std::io;
use std::path::{Path, PathBuf};

use artifex_core::application::ports::{Filesystem, FilesystemError};
use tracing::{debug, instrument};
use walkdir::WalkDir;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    #[instrument(level = "debug", skip(self))]
    fn walk(&self, root: &Path) -> Result<Vec<PathBuf>, FilesystemError> {
        if !root.is_dir() {
            return Ok(Vec::new());
        }
        let mut paths = Vec::new();
        for entry in WalkDir::new(root).min_depth(1) {
            let entry = entry.map_err(|e| {
                FilesystemError::new(
                    e.path().unwrap_or(root).to_path_buf(),
                    format!("failed to walk: {e}"),
                )
            })?;
            paths.push(entry.into_path());
        }
        debug!(count = paths.len(), "walked target directory");
        Ok(paths)
    }

    fn read_file(&self, path: &Path) -> Result<Option<String>, FilesystemError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(map_io_error(path, e, "read file")),
        }
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<(), FilesystemError> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), FilesystemError> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn dir_is_empty(&self, path: &Path) -> Result<bool, FilesystemError> {
        let mut entries =
            std::fs::read_dir(path).map_err(|e| map_io_error(path, e, "list directory"))?;
        Ok(entries.next().is_none())
    }

    fn remove_file(&self, path: &Path) -> Result<(), FilesystemError> {
        std::fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn remove_dir(&self, path: &Path) -> Result<(), FilesystemError> {
        std::fs::remove_dir(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> FilesystemError {
    FilesystemError::new(path.to_path_buf(), format!("failed to {operation}: {e}"))
}
