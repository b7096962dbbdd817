//! Query relay library.
//!
//! Forwards query submissions to an upstream query service and relays its
//! per-request event stream back to browsers as server-sent events.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;
pub mod upstream;

pub use config::schema::RelayConfig;
pub use error::RelayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
