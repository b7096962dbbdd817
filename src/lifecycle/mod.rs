//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger graceful shutdown
//!
//! Shutdown (shutdown.rs):
//!     trigger → server stops accepting → open connections drain
//!     → Shutdown::drain gives up after the grace period (event streams may never end)
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::{Drain, Shutdown};
pub use signals::wait_for_signal;
