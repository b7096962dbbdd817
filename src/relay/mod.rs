//! Query forwarding and event stream relay.
//!
//! # Data Flow
//! ```text
//! POST /api/query  → forwarder.rs → UpstreamClient::submit_query → JSON back
//!
//! GET /api/query?request_id=ID
//!     → stream.rs worker → UpstreamClient::open_stream
//!     → lines.rs (split + decode) → sse.rs (frame) → channel → client body
//! ```

pub mod forwarder;
pub mod lines;
pub mod sse;
pub mod stream;

pub use forwarder::{forward_query, QueryRequest};
pub use stream::{spawn_relay, RelayEnd};
