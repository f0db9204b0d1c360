//! Host-to-frontend events
//!
//! Each event has a fixed name and payload type. Listening is tied to the
//! lifetime of the returned [`EventStream`]: dropping it unsubscribes.

use std::marker::PhantomData;

use futures_util::stream::{self, Stream};
use serde::de::DeserializeOwned;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::transport::{EventEnvelope, Transport, TransportError};
use crate::types::{AppState, WindowData};

pub trait Event {
    const NAME: &'static str;
    type Payload: DeserializeOwned + Send + 'static;
}

/// Full application snapshot after any host-side change.
pub struct UpdateState;

impl Event for UpdateState {
    const NAME: &'static str = "update_state";
    type Payload = AppState;
}

/// Open views after a view was added, removed or changed.
pub struct UpdateWindows;

impl Event for UpdateWindows {
    const NAME: &'static str = "update_windows";
    type Payload = Vec<WindowData>;
}

/// Decoded payloads of one event kind.
pub struct EventStream<E: Event> {
    rx: broadcast::Receiver<EventEnvelope>,
    _event: PhantomData<fn() -> E>,
}

impl<E: Event> EventStream<E> {
    pub fn new(rx: broadcast::Receiver<EventEnvelope>) -> Self {
        Self {
            rx,
            _event: PhantomData,
        }
    }

    /// Next payload, `None` once the host side is gone.
    pub async fn next(&mut self) -> Option<E::Payload> {
        loop {
            match self.rx.recv().await {
                Ok(envelope) if envelope.event == E::NAME => {
                    match serde_json::from_value(envelope.payload) {
                        Ok(payload) => return Some(payload),
                        Err(e) => {
                            tracing::warn!(event = E::NAME, error = %e, "Dropping undecodable event");
                        }
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(event = E::NAME, skipped, "Event listener lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    pub fn into_stream(self) -> impl Stream<Item = E::Payload> {
        stream::unfold(self, |mut events| async move {
            let payload = events.next().await?;
            Some((payload, events))
        })
    }
}

pub fn listen<E: Event, T: Transport + ?Sized>(transport: &T) -> EventStream<E> {
    EventStream::new(transport.subscribe())
}

/// Wait for the next occurrence of `E`.
pub async fn once<E: Event, T: Transport + ?Sized>(
    transport: &T,
) -> Result<E::Payload, TransportError> {
    listen::<E, T>(transport)
        .next()
        .await
        .ok_or(TransportError::Disconnected)
}
