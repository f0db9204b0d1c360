//! View error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("view not found: {0}")]
    NotFound(String),

    #[error("view already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("invalid label: {0:?}")]
    InvalidLabel(String),

    #[error("alpha must be between 0 and 1, got {0}")]
    InvalidAlpha(f64),

    #[error("storage error: {0}")]
    Storage(#[from] relais_storage::StorageError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

impl From<rusqlite::Error> for ViewError {
    fn from(e: rusqlite::Error) -> Self {
        ViewError::Storage(e.into())
    }
}

/// Failures reported by the platform while driving a window.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("window not found: {0}")]
    NotFound(String),

    #[error("window already exists: {0}")]
    AlreadyExists(String),

    #[error("window operation failed: {0}")]
    Platform(String),
}
