//! Configuration validation.
//!
//! Returns every problem found rather than stopping at the first one.
//! Validation is a pure function: `&RelayConfig -> Result<(), Vec<ValidationError>>`.

use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener port must be non-zero")]
    ZeroPort,

    #[error("upstream base URL '{url}' is invalid: {reason}")]
    InvalidUpstreamUrl { url: String, reason: String },

    #[error("{field} must be greater than zero")]
    NonPositive { field: &'static str },
}

/// Check a configuration for values serde cannot reject on its own.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    if let Err(reason) = check_upstream_url(&config.upstream.base_url) {
        errors.push(ValidationError::InvalidUpstreamUrl {
            url: config.upstream.base_url.clone(),
            reason,
        });
    }

    let positives = [
        ("upstream.query_timeout_secs", config.upstream.query_timeout_secs as usize),
        ("timeouts.request_secs", config.timeouts.request_secs as usize),
        ("limits.max_body_bytes", config.limits.max_body_bytes),
        ("limits.stream_buffer", config.limits.stream_buffer),
    ];
    for (field, value) in positives {
        if value == 0 {
            errors.push(ValidationError::NonPositive { field });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_upstream_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{other}'")),
    }
    if url.cannot_be_a_base() {
        return Err("URL cannot carry path segments".to_string());
    }
    Ok(())
}
