//! Reactive application state
//!
//! A single slot holding the latest [`AppState`] pushed by the host, absent
//! until the first push. Built on `tokio::sync::watch`: subscribers are
//! woken on every replacement and always read the newest value, though
//! replacements in quick succession may be observed only once.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::event::{listen, UpdateState};
use crate::transport::Transport;
use crate::types::AppState;

pub use tokio::sync::watch::Receiver as StateReceiver;

pub struct StateStore<S = AppState> {
    tx: Arc<watch::Sender<Option<S>>>,
}

impl<S> StateStore<S> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Swap in a whole new snapshot.
    pub fn replace(&self, value: S) {
        self.tx.send_replace(Some(value));
    }

    pub fn subscribe(&self) -> StateReceiver<Option<S>> {
        self.tx.subscribe()
    }
}

impl<S: Clone> StateStore<S> {
    pub fn get(&self) -> Option<S> {
        self.tx.borrow().clone()
    }
}

impl StateStore<AppState> {
    /// Keep the slot in step with the host's `update_state` pushes.
    ///
    /// The subscription is taken before this returns, so no push sent
    /// afterwards is missed. The task ends when the transport closes.
    pub fn follow<T: Transport + ?Sized>(&self, transport: &T) -> JoinHandle<()> {
        let mut events = listen::<UpdateState, T>(transport);
        let store = self.clone();

        tokio::spawn(async move {
            while let Some(state) = events.next().await {
                tracing::debug!(windows = state.windows.len(), "State updated by host");
                store.replace(state);
            }
        })
    }
}

impl<S> Default for StateStore<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for StateStore<S> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}
