//! Structured logging.
//!
//! `RUST_LOG` always wins. Without it, development mode logs at debug and
//! everything else at info. JSON output is available for log shippers.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Default filter directives for the given mode.
pub fn default_directives(debug: bool) -> &'static str {
    if debug {
        "query_relay=debug,tower_http=debug"
    } else {
        "query_relay=info,tower_http=info"
    }
}

/// Install the global tracing subscriber.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(config.debug).into());

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}
