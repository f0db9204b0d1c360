//! Transport abstraction for host commands and pushes.
//!
//! A transport moves one command request to the host and its reply back, and
//! fans host events out to subscribers. The in-process transport calls the
//! host directly; [`crate::StreamTransport`] frames the same exchange over a
//! byte stream.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;

/// Channel failures, as opposed to failures reported by the host.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("transport disconnected")]
    Disconnected,

    #[error("transport io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed message: {0}")]
    Codec(#[from] serde_json::Error),

    /// A frame that names its request but does not decode
    #[error("malformed frame for request {request_id}: {source}")]
    Malformed {
        request_id: u64,
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum InvokeError {
    /// The host ran the command and reported failure
    #[error("{0}")]
    Host(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// One command call as it reaches the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeRequest {
    pub cmd: String,
    /// Flat argument record, `null` for commands without arguments
    pub args: Value,
    /// Label of the calling window
    pub origin: String,
}

impl InvokeRequest {
    pub fn new(cmd: impl Into<String>, args: Value, origin: impl Into<String>) -> Self {
        Self {
            cmd: cmd.into(),
            args,
            origin: origin.into(),
        }
    }
}

/// A named host push with its JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event: String,
    pub payload: Value,
}

impl EventEnvelope {
    pub fn new(event: impl Into<String>, payload: Value) -> Self {
        Self {
            event: event.into(),
            payload,
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Run one command on the host and wait for its reply.
    async fn invoke(&self, request: InvokeRequest) -> Result<Value, InvokeError>;

    /// Receive every host push sent after this call.
    fn subscribe(&self) -> broadcast::Receiver<EventEnvelope>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn invoke(&self, request: InvokeRequest) -> Result<Value, InvokeError> {
        (**self).invoke(request).await
    }

    fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        (**self).subscribe()
    }
}
