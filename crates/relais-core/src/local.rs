//! In-process transport
//!
//! For frontends living in the same process as the host: requests go straight
//! to [`Host::dispatch`] and subscriptions read the host's event bus.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

use relais_bridge::{EventEnvelope, InvokeError, InvokeRequest, Transport};

use crate::host::Host;

pub struct LocalTransport {
    host: Arc<Host>,
}

impl LocalTransport {
    pub fn new(host: Arc<Host>) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &Arc<Host> {
        &self.host
    }
}

impl Clone for LocalTransport {
    fn clone(&self) -> Self {
        Self {
            host: Arc::clone(&self.host),
        }
    }
}

#[async_trait]
impl Transport for LocalTransport {
    async fn invoke(&self, request: InvokeRequest) -> Result<Value, InvokeError> {
        let host = Arc::clone(&self.host);
        tokio::task::spawn_blocking(move || {
            host.dispatch(&request.origin, &request.cmd, request.args)
        })
        .await
        .unwrap_or_else(|e| Err(format!("command panicked: {e}")))
        .map_err(InvokeError::Host)
    }

    fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.host.subscribe()
    }
}
