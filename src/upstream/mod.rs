//! Upstream query service access.
//!
//! # Contract
//! ```text
//! POST {base}/query              JSON {q, budget, maxBadAttempt} → JSON
//! GET  {base}/stream/{request_id} → chunked text body, one event per line
//! ```

pub mod client;

pub use client::UpstreamClient;
