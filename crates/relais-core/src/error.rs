//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] relais_storage::StorageError),

    #[error(transparent)]
    View(#[from] relais_views::ViewError),

    #[error(transparent)]
    Surface(#[from] relais_views::SurfaceError),

    #[error("Transport error: {0}")]
    Transport(#[from] relais_bridge::TransportError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("invalid arguments for {cmd}: {reason}")]
    InvalidArguments { cmd: String, reason: String },
}
