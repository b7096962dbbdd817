//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment (PORT, NODE_SERVER_URL, FLASK_ENV, ...)
//!     → loader.rs (read & parse variables over defaults)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → shared via Arc to all handlers
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never changes
//! - All fields have defaults so an empty environment is a valid setup
//! - Validation separates parsing from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_from, load_from_env, ConfigError};
pub use schema::{
    LimitsConfig, ListenerConfig, LogFormat, ObservabilityConfig, RelayConfig, TimeoutConfig,
    UpstreamConfig,
};
