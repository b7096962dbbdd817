//! Query relay
//!
//! A thin reverse proxy between a browser client and an upstream query service.
//!
//! # Architecture Overview
//!
//! ```text
//!   Browser                         QUERY RELAY                          Upstream
//!                     ┌──────────────────────────────────────┐
//!   POST /api/query ─▶│ http::server ─▶ relay::forwarder ────┼─▶ POST {base}/query
//!   ◀── JSON ─────────│                                      │◀── JSON
//!                     │                                      │
//!   GET /api/query ──▶│ http::server ─▶ relay::stream worker ┼─▶ GET {base}/stream/{id}
//!   ?request_id=ID    │                   │ lines → frames   │◀── chunked lines
//!   ◀── SSE frames ───│ http::response ◀── channel           │
//!                     │                                      │
//!   GET /health ─────▶│ {"status":"healthy"}                 │
//!                     └──────────────────────────────────────┘
//! ```

use tokio::net::TcpListener;

use query_relay::config;
use query_relay::http::HttpServer;
use query_relay::lifecycle::{wait_for_signal, Drain, Shutdown};
use query_relay::observability::init_logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_from_env()?;

    init_logging(&config.observability);

    tracing::info!("query-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        upstream = %config.upstream.base_url,
        debug = config.observability.debug,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    let shutdown = Shutdown::from_config(&config.timeouts);
    let server = HttpServer::new(config)?;
    let mut server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    tokio::select! {
        result = &mut server_task => {
            result??;
            return Ok(());
        }
        _ = wait_for_signal() => shutdown.trigger(),
    }

    if let Drain::Finished(result) = shutdown.drain(server_task).await {
        result??;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
