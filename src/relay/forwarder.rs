//! Query submission forwarding.
//!
//! One inbound POST becomes exactly one upstream POST. The upstream's JSON is
//! returned untouched on 200; any other status is passed back with the raw
//! upstream body under `details`.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RelayError, Result};
use crate::upstream::UpstreamClient;

pub const DEFAULT_BUDGET: i64 = 1_000_000;
pub const DEFAULT_MAX_BAD_ATTEMPT: i64 = 3;

/// Query payload, shared by the inbound and upstream sides.
///
/// The numeric fields accept any JSON integer; range checks belong to the
/// upstream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub q: String,

    #[serde(default = "default_budget")]
    pub budget: i64,

    #[serde(default = "default_max_bad_attempt")]
    pub max_bad_attempt: i64,
}

fn default_budget() -> i64 {
    DEFAULT_BUDGET
}

fn default_max_bad_attempt() -> i64 {
    DEFAULT_MAX_BAD_ATTEMPT
}

impl QueryRequest {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            budget: DEFAULT_BUDGET,
            max_bad_attempt: DEFAULT_MAX_BAD_ATTEMPT,
        }
    }

    /// Parse an inbound request body.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }
}

/// Forward a raw inbound body to the upstream and return its JSON answer.
pub async fn forward_query(
    client: &UpstreamClient,
    body: &[u8],
    request_id: Option<&str>,
) -> Result<Value> {
    let query = QueryRequest::from_slice(body)?;

    tracing::debug!(
        request_id = request_id.unwrap_or("-"),
        budget = query.budget,
        max_bad_attempt = query.max_bad_attempt,
        "Forwarding query"
    );

    let response = client.submit_query(&query, request_id).await?;
    let status = response.status();

    if status != StatusCode::OK {
        let details = response.text().await?;
        tracing::warn!(
            request_id = request_id.unwrap_or("-"),
            status = %status,
            "Upstream rejected query"
        );
        return Err(RelayError::UpstreamRejected { status, details });
    }

    Ok(response.json::<Value>().await?)
}
