//! Response construction for the event stream.
//!
//! Frames arrive already encoded, so the body is written as raw bytes rather
//! than through an SSE event encoder: upstream lines that already start with
//! `data:` must reach the client exactly as sent.

use std::convert::Infallible;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderName},
    response::{IntoResponse, Response},
};
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// Tells nginx-style front proxies not to buffer the body.
pub const X_ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

pub const EVENT_STREAM: &str = "text/event-stream";

/// Stream every frame received on `frames` to the client, unbuffered.
pub fn event_stream(frames: mpsc::Receiver<Bytes>) -> Response {
    let body = Body::from_stream(ReceiverStream::new(frames).map(Ok::<_, Infallible>));

    (
        [
            (header::CONTENT_TYPE, EVENT_STREAM),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
            (X_ACCEL_BUFFERING, "no"),
        ],
        body,
    )
        .into_response()
}
