//! HTTP server setup and handlers.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, body limit, timeout)
//! - Bind the server to a listener and stop on the shutdown signal
//! - Forward query submissions and relay event streams to the upstream

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::{Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::error::{RelayError, Result};
use crate::http::request::{request_id, UuidRequestId, X_REQUEST_ID};
use crate::http::response::event_stream;
use crate::relay::{forward_query, spawn_relay};
use crate::upstream::UpstreamClient;

const LANDING_PAGE: &str = include_str!("../../assets/index.html");

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(config: RelayConfig) -> Result<Self> {
        let upstream = UpstreamClient::new(&config.upstream)?;
        Ok(Self {
            config: Arc::new(config),
            upstream,
        })
    }
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: Arc<RelayConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self> {
        let state = AppState::new(config)?;
        let config = state.config.clone();
        let router = build_router(state);
        Ok(Self { router, config })
    }

    /// Run the server until `shutdown` fires, then drain open connections.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config.timeouts.request_secs);
    let body_limit = state.config.limits.max_body_bytes;

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/query", get(subscribe_stream).post(submit_query))
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(middleware::from_fn(json_error_bodies))
        .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
}

async fn index() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Forward a query submission to the upstream.
async fn submit_query(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>> {
    let request_id = request_id(&headers);

    match forward_query(&state.upstream, &body, request_id.as_deref()).await {
        Ok(answer) => Ok(Json(answer)),
        Err(e) => {
            if matches!(e, RelayError::InvalidPayload(_) | RelayError::Transport(_)) {
                tracing::error!(
                    request_id = request_id.as_deref().unwrap_or("-"),
                    error = %e,
                    "Query forwarding failed"
                );
            }
            Err(e)
        }
    }
}

/// Relay the upstream event stream for `request_id`.
///
/// A repeated `request_id` uses its first occurrence.
async fn subscribe_stream(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response> {
    let stream_id = params
        .into_iter()
        .find(|(key, _)| key == "request_id")
        .map(|(_, id)| id)
        .filter(|id| !id.is_empty())
        .ok_or(RelayError::MissingRequestId)?;

    tracing::info!(stream_id = %stream_id, "Opening event stream relay");

    let frames = spawn_relay(
        state.upstream.clone(),
        stream_id,
        request_id(&headers),
        state.config.limits.stream_buffer,
    );
    Ok(event_stream(frames))
}

/// Give the middleware rejections (408, 413) the same `{error}` body as
/// handler errors. Responses that already carry JSON pass through untouched.
async fn json_error_bodies(request: Request<Body>, next: Next) -> Response {
    let response = next.run(request).await;

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if is_json {
        return response;
    }

    match response.status() {
        StatusCode::REQUEST_TIMEOUT => RelayError::RequestTimeout.into_response(),
        StatusCode::PAYLOAD_TOO_LARGE => RelayError::PayloadTooLarge.into_response(),
        _ => response,
    }
}
