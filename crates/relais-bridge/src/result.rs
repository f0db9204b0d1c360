//! Tagged command results
//!
//! The host reports failure as data rather than as a thrown error. A
//! [`CommandResult`] is either `{"status":"ok","data":..}` or
//! `{"status":"error","error":..}`; [`unwrap`] is the one place where the
//! error tag turns into a Rust error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CommandResult<T, E = String> {
    Ok { data: T },
    Error { error: E },
}

impl<T, E> CommandResult<T, E> {
    pub fn ok(data: T) -> Self {
        CommandResult::Ok { data }
    }

    pub fn err(error: E) -> Self {
        CommandResult::Error { error }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, CommandResult::Ok { .. })
    }

    pub fn is_error(&self) -> bool {
        !self.is_ok()
    }

    pub fn into_result(self) -> Result<T, E> {
        match self {
            CommandResult::Ok { data } => Ok(data),
            CommandResult::Error { error } => Err(error),
        }
    }
}

impl<T, E> From<Result<T, E>> for CommandResult<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => CommandResult::Ok { data },
            Err(error) => CommandResult::Error { error },
        }
    }
}

/// Failure reported by the host for a single command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct HostError(pub String);

impl HostError {
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Extract the payload of a successful result.
///
/// An error result is logged before being handed back, so callers that only
/// propagate it still leave a trace.
pub fn unwrap<T>(result: CommandResult<T>) -> Result<T, HostError> {
    match result {
        CommandResult::Ok { data } => Ok(data),
        CommandResult::Error { error } => {
            tracing::error!(error = %error, "Host command failed");
            Err(HostError(error))
        }
    }
}
