//! In-memory filesystem adapter for testing.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use artifex_core::application::ports::{Filesystem, FilesystemError};

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can hold a handle while the generator works
/// through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
    writes: usize,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of `write_file` calls observed (testing helper; lets
    /// idempotence tests assert that an unchanged run writes nothing).
    pub fn write_count(&self) -> usize {
        self.inner.read().map(|i| i.writes).unwrap_or(0)
    }

    /// All current file paths, sorted (testing helper).
    pub fn file_paths(&self) -> Vec<PathBuf> {
        let inner = match self.inner.read() {
            Ok(inner) => inner,
            Err(_) => return Vec::new(),
        };
        let mut paths: Vec<_> = inner.files.keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Clear all contents.
    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.files.clear();
            inner.directories.clear();
            inner.writes = 0;
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, MemoryFilesystemInner>, FilesystemError> {
        self.inner
            .read()
            .map_err(|_| FilesystemError::new("<memory>", "filesystem lock poisoned"))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, MemoryFilesystemInner>, FilesystemError> {
        self.inner
            .write()
            .map_err(|_| FilesystemError::new("<memory>", "filesystem lock poisoned"))
    }
}

impl Filesystem for MemoryFilesystem {
    fn walk(&self, root: &Path) -> Result<Vec<PathBuf>, FilesystemError> {
        let inner = self.read()?;
        let mut paths: Vec<PathBuf> = inner
            .files
            .keys()
            .chain(inner.directories.iter())
            .filter(|p| p.starts_with(root) && p.as_path() != root)
            .cloned()
            .collect();
        paths.sort();
        Ok(paths)
    }

    fn read_file(&self, path: &Path) -> Result<Option<String>, FilesystemError> {
        Ok(self.read()?.files.get(path).cloned())
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<(), FilesystemError> {
        let mut inner = self.write()?;
        inner.files.insert(path.to_path_buf(), content.to_string());
        inner.writes += 1;
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), FilesystemError> {
        let mut inner = self.write()?;
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }
        Ok(())
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.read().map(|i| i.directories.contains(path)).unwrap_or(false)
    }

    fn dir_is_empty(&self, path: &Path) -> Result<bool, FilesystemError> {
        let inner = self.read()?;
        let occupied = inner
            .files
            .keys()
            .chain(inner.directories.iter())
            .any(|p| p.parent() == Some(path));
        Ok(!occupied)
    }

    fn remove_file(&self, path: &Path) -> Result<(), FilesystemError> {
        let mut inner = self.write()?;
        inner
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| FilesystemError::new(path, "failed to remove file: not found"))
    }

    fn remove_dir(&self, path: &Path) -> Result<(), FilesystemError> {
        let mut inner = self.write()?;
        if !inner.directories.remove(path) {
            return Err(FilesystemError::new(
                path,
                "failed to remove directory: not found",
            ));
        }
        Ok(())
    }
}
