//! Error types for the relay and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the relay's request handlers.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The inbound query body could not be understood.
    #[error("{0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// The subscription request carried no `request_id`.
    #[error("No request ID provided")]
    MissingRequestId,

    /// The upstream answered with a non-200 status.
    #[error("Failed to process query")]
    UpstreamRejected { status: StatusCode, details: String },

    /// The upstream could not be reached or its response could not be read.
    #[error("{}", describe(.0))]
    Transport(#[from] reqwest::Error),

    /// No response was produced within the request timeout.
    #[error("Request timed out")]
    RequestTimeout,

    /// The inbound body exceeded the configured size limit.
    #[error("Request body too large")]
    PayloadTooLarge,

    /// The upstream HTTP client could not be constructed.
    #[error("failed to build upstream client: {0}")]
    ClientBuild(String),
}

/// Result type alias for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingRequestId => StatusCode::BAD_REQUEST,
            RelayError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            RelayError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::UpstreamRejected { status, .. } => *status,
            RelayError::InvalidPayload(_)
            | RelayError::Transport(_)
            | RelayError::ClientBuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            RelayError::UpstreamRejected { details, .. } => json!({
                "error": self.to_string(),
                "details": details,
            }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

/// Render an error together with its chain of sources.
pub fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
