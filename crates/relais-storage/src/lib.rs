//! Relais Storage Layer
//!
//! SQLite persistence for host-side settings and the views that should be
//! reopened on the next start.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
