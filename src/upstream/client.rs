//! HTTP client for the upstream query service.

use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use url::Url;

use crate::config::UpstreamConfig;
use crate::error::{RelayError, Result};
use crate::http::X_REQUEST_ID;
use crate::relay::QueryRequest;

/// Pooled client bound to one upstream base URL.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base: Url,
    query_timeout: Duration,
}

impl UpstreamClient {
    /// Build a client for the configured upstream.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| RelayError::ClientBuild(format!("{}: {e}", config.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(RelayError::ClientBuild(format!(
                "{} cannot carry path segments",
                config.base_url
            )));
        }

        let mut builder = reqwest::Client::builder();
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder
            .build()
            .map_err(|e| RelayError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            base,
            query_timeout: config.query_timeout(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `{base}/query`
    pub fn query_url(&self) -> Url {
        self.join(&["query"])
    }

    /// `{base}/stream/{request_id}`, with the id encoded as a single segment.
    pub fn stream_url(&self, request_id: &str) -> Url {
        self.join(&["stream", request_id])
    }

    fn join(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // Checked in `new`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Submit a query. Bounded by the query timeout.
    ///
    /// Returns whatever the upstream answered; status handling is up to the caller.
    pub async fn submit_query(
        &self,
        query: &QueryRequest,
        request_id: Option<&str>,
    ) -> std::result::Result<reqwest::Response, reqwest::Error> {
        let mut request = self
            .http
            .post(self.query_url())
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.query_timeout)
            .json(query);
        if let Some(id) = request_id {
            request = request.header(X_REQUEST_ID, id);
        }
        request.send().await
    }

    /// Open the event stream for `stream_id`. No timeout applies.
    pub async fn open_stream(
        &self,
        stream_id: &str,
        request_id: Option<&str>,
    ) -> std::result::Result<reqwest::Response, reqwest::Error> {
        let mut request = self.http.get(self.stream_url(stream_id));
        if let Some(id) = request_id {
            request = request.header(X_REQUEST_ID, id);
        }
        request.send().await
    }
}
