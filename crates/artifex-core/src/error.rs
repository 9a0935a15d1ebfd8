//! Unified error handling for the generation engine.

use std::path::PathBuf;
use thiserror::Error;

use crate::application::{FilesystemError, GenerationError};
use crate::domain::ConfigurationError;

/// Root error type for engine operations.
#[derive(Debug, Error)]
pub enum ArtifexError {
    /// Fatal configuration mistakes, raised before any file is touched.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A per-element failure during a generation run.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// A filesystem failure outside any single template's render (the
    /// initial directory scan or the final deletion pass).
    #[error("filesystem error at {}: {reason}", path.display())]
    Filesystem { path: PathBuf, reason: String },
}

impl From<FilesystemError> for ArtifexError {
    fn from(err: FilesystemError) -> Self {
        ArtifexError::Filesystem {
            path: err.path,
            reason: err.reason,
        }
    }
}

/// Convenient result type alias.
pub type ArtifexResult<T> = Result<T, ArtifexError>;
