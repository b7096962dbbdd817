//! Upstream event stream relay.
//!
//! # State machine
//! ```text
//! OPEN → (RELAY_LINE)* → CLOSE
//! OPEN → ERROR_EMIT → CLOSE          (any transport error)
//! ```
//!
//! A worker task owns the upstream connection and pushes framed chunks into a
//! bounded channel; the receiving half becomes the client response body.
//! Dropping the receiver (client gone) stops the worker, which drops the
//! upstream connection with it.

use axum::body::Bytes;
use futures_util::StreamExt;
use tokio::sync::mpsc;

use crate::error::describe;
use crate::relay::lines::LineDecoder;
use crate::relay::sse::{error_frame, frame_line, CLOSE_FRAME};
use crate::upstream::UpstreamClient;

/// How a relay ended without a transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayEnd {
    /// The upstream finished its body.
    UpstreamClosed,
    /// The client stopped reading.
    ClientGone,
}

/// Start relaying the upstream stream for `stream_id`.
///
/// Returns the receiving half of the frame channel. The stream ends when the
/// channel yields `None`.
pub fn spawn_relay(
    client: UpstreamClient,
    stream_id: String,
    request_id: Option<String>,
    buffer: usize,
) -> mpsc::Receiver<Bytes> {
    let (tx, rx) = mpsc::channel(buffer.max(1));

    tokio::spawn(async move {
        run_relay(&client, &stream_id, request_id.as_deref(), &tx).await;
    });

    rx
}

/// Drive one relay to completion, emitting the error and close frames on failure.
pub async fn run_relay(
    client: &UpstreamClient,
    stream_id: &str,
    request_id: Option<&str>,
    tx: &mpsc::Sender<Bytes>,
) {
    tracing::debug!(stream_id, request_id = request_id.unwrap_or("-"), "Opening upstream stream");

    match relay_lines(client, stream_id, request_id, tx).await {
        Ok(RelayEnd::UpstreamClosed) => {
            tracing::debug!(stream_id, "Upstream stream ended");
        }
        Ok(RelayEnd::ClientGone) => {
            tracing::debug!(stream_id, "Client disconnected, releasing upstream");
        }
        Err(e) => {
            let message = describe(&e);
            tracing::warn!(stream_id, error = %message, "Upstream stream failed");
            if tx.send(Bytes::from(error_frame(&message))).await.is_ok() {
                let _ = tx.send(Bytes::from_static(CLOSE_FRAME.as_bytes())).await;
            }
        }
    }
}

async fn relay_lines(
    client: &UpstreamClient,
    stream_id: &str,
    request_id: Option<&str>,
    tx: &mpsc::Sender<Bytes>,
) -> Result<RelayEnd, reqwest::Error> {
    let response = tokio::select! {
        biased;
        _ = tx.closed() => return Ok(RelayEnd::ClientGone),
        response = client.open_stream(stream_id, request_id) => response?,
    };

    if !response.status().is_success() {
        tracing::warn!(stream_id, status = %response.status(), "Upstream stream answered with error status");
    }

    let mut body = std::pin::pin!(response.bytes_stream());
    let mut decoder = LineDecoder::new();

    loop {
        let chunk = tokio::select! {
            biased;
            _ = tx.closed() => return Ok(RelayEnd::ClientGone),
            chunk = body.next() => chunk,
        };

        let lines = match chunk {
            Some(chunk) => decoder.push(&chunk?),
            None => {
                if let Some(line) = decoder.finish() {
                    if !emit(tx, &line).await {
                        return Ok(RelayEnd::ClientGone);
                    }
                }
                return Ok(RelayEnd::UpstreamClosed);
            }
        };

        for line in lines {
            if !emit(tx, &line).await {
                return Ok(RelayEnd::ClientGone);
            }
        }
    }
}

/// Send one framed line. Returns false once the client is gone.
async fn emit(tx: &mpsc::Sender<Bytes>, line: &str) -> bool {
    match frame_line(line) {
        Some(frame) => tx.send(Bytes::from(frame)).await.is_ok(),
        None => true,
    }
}
