//! Configuration loading from the process environment.

use thiserror::Error;

use crate::config::schema::{LogFormat, RelayConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Port to listen on.
pub const ENV_PORT: &str = "PORT";
/// Base URL of the upstream query service.
pub const ENV_UPSTREAM_URL: &str = "NODE_SERVER_URL";
/// `development` switches on debug mode.
pub const ENV_MODE: &str = "FLASK_ENV";
/// Query submission timeout in seconds.
pub const ENV_QUERY_TIMEOUT: &str = "RELAY_QUERY_TIMEOUT_SECS";
/// `pretty` or `json`.
pub const ENV_LOG_FORMAT: &str = "RELAY_LOG_FORMAT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}'")]
    InvalidVar { var: &'static str, value: String },

    #[error("validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from the process environment.
pub fn load_from_env() -> Result<RelayConfig, ConfigError> {
    load_from(|key| std::env::var(key).ok())
}

/// Load and validate configuration using `lookup` to resolve variables.
///
/// Unset variables keep their defaults.
pub fn load_from<F>(lookup: F) -> Result<RelayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = RelayConfig::default();

    if let Some(port) = lookup(ENV_PORT) {
        config.listener.port = parse_var(ENV_PORT, &port)?;
    }

    if let Some(url) = lookup(ENV_UPSTREAM_URL) {
        config.upstream.base_url = url;
    }

    config.observability.debug = lookup(ENV_MODE).as_deref() == Some("development");

    if let Some(secs) = lookup(ENV_QUERY_TIMEOUT) {
        config.upstream.query_timeout_secs = parse_var(ENV_QUERY_TIMEOUT, &secs)?;
    }

    if let Some(format) = lookup(ENV_LOG_FORMAT) {
        config.observability.log_format = match format.trim().to_ascii_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            _ => {
                return Err(ConfigError::InvalidVar {
                    var: ENV_LOG_FORMAT,
                    value: format,
                })
            }
        };
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn parse_var<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidVar {
        var,
        value: value.to_string(),
    })
}
