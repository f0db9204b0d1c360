//! Stream server
//!
//! Host end of the newline-delimited JSON protocol spoken by
//! [`relais_bridge::StreamTransport`]. Each request is dispatched on the
//! blocking pool, so responses go out in completion order. Every bus event is
//! forwarded as an event frame while the connection lasts.

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;

use relais_bridge::ipc::{frame_lines, read_frame, write_frame};
use relais_bridge::{Frame, TransportError};

use crate::host::Host;
use crate::Result;

/// Serve one connection until the reader reaches end of stream.
pub async fn serve<R, W>(host: Arc<Host>, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Frame>();

    let writer_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if let Err(e) = write_frame(&mut writer, &frame).await {
                tracing::debug!(error = %e, "Client stopped reading");
                break;
            }
        }
    });

    let mut events = host.subscribe();
    let event_tx = tx.clone();
    let forwarder = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(envelope) => {
                    if event_tx.send(Frame::event(envelope)).is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Client fell behind on events");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    tracing::info!("Client connected");

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
                tracing::warn!(request_id, error = %source, "Rejecting malformed request");
                let _ = tx.send(Frame::response(
                    request_id,
                    Err(format!("malformed request: {source}")),
                ));
                continue;
            }
            Err(e) => {
                forwarder.abort();
                return Err(e.into());
            }
        };

        match frame {
            Frame::Request {
                request_id,
                origin,
                cmd,
                args,
            } => {
                let host = Arc::clone(&host);
                let tx = tx.clone();
                tokio::spawn(async move {
                    // Commands touch SQLite and the windowing platform
                    let outcome = tokio::task::spawn_blocking(move || {
                        host.dispatch(&origin, &cmd, args)
                    })
                    .await
                    .unwrap_or_else(|e| Err(format!("command panicked: {e}")));
                    // The writer is gone once the client hung up
                    let _ = tx.send(Frame::response(request_id, outcome));
                });
            }
            Frame::Response { request_id, .. } => {
                tracing::warn!(request_id, "Ignoring response frame sent to host");
            }
            Frame::Event { event, .. } => {
                tracing::warn!(event = %event, "Ignoring event frame sent to host");
            }
        }
    }

    tracing::info!("Client disconnected");

    forwarder.abort();
    drop(tx);

    if let Err(e) = writer_task.await {
        tracing::error!(error = %e, "Writer task failed");
    }

    Ok(())
}
