//! Relais Bridge
//!
//! Frontend side of the host boundary. Every host command is exposed as a
//! typed async method on [`Commands`]; results come back as a
//! [`CommandResult`] that callers either match on or [`unwrap`] into a
//! `Result`. Host pushes arrive on the event channel and feed the
//! [`StateStore`].
//!
//! The bridge knows nothing about how requests reach the host. That is the
//! job of a [`Transport`]: [`StreamTransport`] speaks newline-delimited JSON
//! over any byte stream, and the host crate provides an in-process one.

pub mod actions;
pub mod commands;
pub mod event;
pub mod ipc;
pub mod result;
pub mod store;
pub mod transport;
mod types;

pub use actions::{Actions, OpenError, Opener};
pub use commands::Commands;
pub use event::{Event, EventStream, UpdateState, UpdateWindows};
pub use ipc::{Frame, StreamTransport};
pub use result::{unwrap, CommandResult, HostError};
pub use store::{StateReceiver, StateStore};
pub use transport::{EventEnvelope, InvokeError, InvokeRequest, Transport, TransportError};
pub use types::{AppState, WindowData, CTRL_LABEL_PREFIX, WINDOW_LABEL_PREFIX};
