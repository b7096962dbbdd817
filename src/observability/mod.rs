//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and relay workers produce:
//!     → tracing events with request_id / stream_id fields
//!     → tower-http TraceLayer spans per request
//! Consumers:
//!     → logging.rs subscriber (pretty or JSON on stdout)
//! ```

pub mod logging;

pub use logging::init_logging;
