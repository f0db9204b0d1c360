//! Host event bus
//!
//! Fan-out of host pushes to every connected frontend. Sending with no
//! listeners is not an error.

use serde::Serialize;
use tokio::sync::broadcast;

use relais_bridge::EventEnvelope;

const BUS_CAPACITY: usize = 128;

pub struct EventBus {
    tx: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self { tx }
    }

    pub fn emit<P: Serialize>(&self, event: &str, payload: &P) {
        let payload = match serde_json::to_value(payload) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(event, error = %e, "Failed to encode event payload");
                return;
            }
        };

        let listeners = self.tx.send(EventEnvelope::new(event, payload)).unwrap_or(0);
        tracing::trace!(event, listeners, "Emitted event");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}
