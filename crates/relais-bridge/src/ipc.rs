//! Newline-delimited JSON transport
//!
//! Each line on the stream is one [`Frame`]. The client writes `request`
//! frames and reads `response` and `event` frames; responses carry the
//! `requestId` of the request they answer and may arrive in any order.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::transport::{EventEnvelope, InvokeError, InvokeRequest, Transport, TransportError};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Frame {
    Request {
        #[serde(rename = "requestId")]
        request_id: u64,
        origin: String,
        cmd: String,
        #[serde(default)]
        args: Value,
    },
    Response {
        #[serde(rename = "requestId")]
        request_id: u64,
        status: Status,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Event {
        event: String,
        #[serde(default)]
        payload: Value,
    },
}

impl Frame {
    pub fn request(request_id: u64, request: InvokeRequest) -> Self {
        Frame::Request {
            request_id,
            origin: request.origin,
            cmd: request.cmd,
            args: request.args,
        }
    }

    pub fn response(request_id: u64, outcome: Result<Value, String>) -> Self {
        match outcome {
            Ok(result) => Frame::Response {
                request_id,
                status: Status::Ok,
                result: Some(result),
                error: None,
            },
            Err(error) => Frame::Response {
                request_id,
                status: Status::Error,
                result: None,
                error: Some(error),
            },
        }
    }

    pub fn event(envelope: EventEnvelope) -> Self {
        Frame::Event {
            event: envelope.event,
            payload: envelope.payload,
        }
    }
}

pub type FrameLines<R> = Lines<BufReader<R>>;

pub fn frame_lines<R: AsyncRead + Unpin>(reader: R) -> FrameLines<R> {
    BufReader::new(reader).lines()
}

/// Read the next frame, `None` at end of stream. Blank lines are skipped.
///
/// A line that is valid JSON but not a valid frame fails with
/// [`TransportError::Malformed`] when it still carries a `requestId`, so the
/// call it answers can be failed instead of left waiting.
pub async fn read_frame<R: AsyncRead + Unpin>(
    lines: &mut FrameLines<R>,
) -> Result<Option<Frame>, TransportError> {
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        return decode_frame(&line).map(Some);
    }

    Ok(None)
}

fn decode_frame(line: &str) -> Result<Frame, TransportError> {
    let value: Value = serde_json::from_str(line)?;
    let request_id = value.get("requestId").and_then(Value::as_u64);

    serde_json::from_value(value).map_err(|source| match request_id {
        Some(request_id) => TransportError::Malformed { request_id, source },
        None => TransportError::Codec(source),
    })
}

pub async fn write_frame<W: AsyncWrite + Unpin>(
    writer: &mut W,
    frame: &Frame,
) -> Result<(), TransportError> {
    let mut line = serde_json::to_string(frame)?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

type Reply = Result<Value, InvokeError>;

/// Calls waiting for a response. `None` once the stream is gone.
type Pending = Arc<Mutex<Option<HashMap<u64, oneshot::Sender<Reply>>>>>;

/// Client end of a frame stream.
pub struct StreamTransport {
    next_id: AtomicU64,
    pending: Pending,
    outgoing: mpsc::UnboundedSender<Frame>,
    events: broadcast::Sender<EventEnvelope>,
    reader_task: JoinHandle<()>,
}

impl StreamTransport {
    /// Start the reader and writer tasks. Must be called inside a Tokio runtime.
    pub fn new<R, W>(reader: R, writer: W) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let pending: Pending = Arc::new(Mutex::new(Some(HashMap::new())));
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (outgoing, rx) = mpsc::unbounded_channel();

        tokio::spawn(write_loop(writer, rx, Arc::clone(&pending)));
        let reader_task = tokio::spawn(read_loop(reader, Arc::clone(&pending), events.clone()));

        Self {
            next_id: AtomicU64::new(1),
            pending,
            outgoing,
            events,
            reader_task,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.pending.lock().is_some()
    }
}

impl Drop for StreamTransport {
    fn drop(&mut self) {
        self.reader_task.abort();
    }
}

#[async_trait]
impl Transport for StreamTransport {
    async fn invoke(&self, request: InvokeRequest) -> Result<Value, InvokeError> {
        let request_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();

        match self.pending.lock().as_mut() {
            Some(pending) => {
                pending.insert(request_id, tx);
            }
            None => return Err(TransportError::Disconnected.into()),
        }

        tracing::trace!(request_id, cmd = %request.cmd, "Sending request");

        if self.outgoing.send(Frame::request(request_id, request)).is_err() {
            if let Some(pending) = self.pending.lock().as_mut() {
                pending.remove(&request_id);
            }
            return Err(TransportError::Disconnected.into());
        }

        match rx.await {
            Ok(reply) => reply,
            Err(_) => Err(TransportError::Disconnected.into()),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.events.subscribe()
    }
}

/// Fail every waiting call and refuse new ones.
fn disconnect(pending: &Pending) {
    if let Some(waiting) = pending.lock().take() {
        if !waiting.is_empty() {
            tracing::warn!(pending = waiting.len(), "Stream closed with calls in flight");
        }
    }
}

fn resolve(pending: &Pending, request_id: u64, reply: Reply) {
    let waiter = pending
        .lock()
        .as_mut()
        .and_then(|waiting| waiting.remove(&request_id));
    match waiter {
        Some(tx) => {
            // The caller may have stopped waiting
            let _ = tx.send(reply);
        }
        None => tracing::warn!(request_id, "Response for unknown request"),
    }
}

async fn write_loop<W>(mut writer: W, mut rx: mpsc::UnboundedReceiver<Frame>, pending: Pending)
where
    W: AsyncWrite + Unpin,
{
    while let Some(frame) = rx.recv().await {
        if let Err(e) = write_frame(&mut writer, &frame).await {
            tracing::error!(error = %e, "Failed to write frame");
            disconnect(&pending);
            return;
        }
    }
}

async fn read_loop<R>(reader: R, pending: Pending, events: broadcast::Sender<EventEnvelope>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = frame_lines(reader);

    loop {
        let frame = match read_frame(&mut lines).await {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(TransportError::Codec(e)) => {
                tracing::warn!(error = %e, "Skipping malformed frame");
                continue;
            }
            Err(TransportError::Malformed { request_id, source }) => {
                tracing::warn!(request_id, error = %source, "Malformed response");
                resolve(&pending, request_id, Err(TransportError::Codec(source).into()));
                continue;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read frame");
                break;
            }
        };

        match frame {
            Frame::Response {
                request_id,
                status,
                result,
                error,
            } => {
                let reply = match status {
                    Status::Ok => Ok(result.unwrap_or(Value::Null)),
                    Status::Error => Err(InvokeError::Host(error.unwrap_or_default())),
                };
                resolve(&pending, request_id, reply);
            }
            Frame::Event { event, payload } => {
                // No subscribers is not an error
                let _ = events.send(EventEnvelope { event, payload });
            }
            Frame::Request { request_id, .. } => {
                tracing::warn!(request_id, "Ignoring request frame sent to client");
            }
        }
    }

    tracing::debug!("Frame stream ended");
    disconnect(&pending);
}
