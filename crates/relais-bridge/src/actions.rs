//! Platform actions used by the frontend
//!
//! Thin wrappers: opening a path goes to the platform [`Opener`], everything
//! else is a single host command.

use std::fmt::Display;

use async_trait::async_trait;
use thiserror::Error;

use crate::commands::Commands;
use crate::result::CommandResult;
use crate::transport::{Transport, TransportError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to open {path}: {reason}")]
pub struct OpenError {
    pub path: String,
    pub reason: String,
}

/// Hands a path or URL to the system's default handler.
#[async_trait]
pub trait Opener: Send + Sync {
    async fn open(&self, path: &str) -> Result<(), OpenError>;
}

pub struct Actions<T, O> {
    commands: Commands<T>,
    opener: O,
}

impl<T: Transport, O: Opener> Actions<T, O> {
    pub fn new(commands: Commands<T>, opener: O) -> Self {
        Self { commands, opener }
    }

    pub fn commands(&self) -> &Commands<T> {
        &self.commands
    }

    pub async fn open(&self, path: &str) -> Result<(), OpenError> {
        self.opener.open(path).await
    }

    /// Forward values to the host log, rendered with `Display`.
    pub async fn log<V: Display>(
        &self,
        values: &[V],
    ) -> Result<CommandResult<()>, TransportError> {
        let values: Vec<String> = values.iter().map(ToString::to_string).collect();
        self.commands.log(&values).await
    }

    pub async fn main_window_focus(&self) -> Result<CommandResult<()>, TransportError> {
        self.commands.main_window_focus().await
    }

    pub async fn window_focus(&self) -> Result<CommandResult<()>, TransportError> {
        self.commands.window_focus().await
    }

    pub async fn window_hide(&self) -> Result<CommandResult<()>, TransportError> {
        self.commands.window_hide().await
    }
}
