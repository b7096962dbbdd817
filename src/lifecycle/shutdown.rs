//! Shutdown coordination for the relay.
//!
//! Axum's graceful shutdown waits for every open connection, and an event
//! stream subscription may never end on its own. The coordinator therefore
//! owns the drain deadline as well as the trigger.

use std::future::Future;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::config::TimeoutConfig;

/// Outcome of waiting for the server to drain.
#[derive(Debug, PartialEq, Eq)]
pub enum Drain<T> {
    /// The server stopped on its own within the grace period.
    Finished(T),
    /// Subscriptions were still open when the grace period ran out.
    Expired,
}

/// Fans a single shutdown trigger out to the server and bounds the drain.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
    grace: Duration,
}

impl Shutdown {
    pub fn new(grace: Duration) -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx, grace }
    }

    pub fn from_config(timeouts: &TimeoutConfig) -> Self {
        Self::new(timeouts.shutdown_grace())
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Tell every subscriber to stop accepting and start draining.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Wait for `server` to finish, giving up once the grace period has passed.
    pub async fn drain<F: Future>(&self, server: F) -> Drain<F::Output> {
        match tokio::time::timeout(self.grace, server).await {
            Ok(output) => Drain::Finished(output),
            Err(_) => {
                tracing::warn!(
                    grace_secs = self.grace.as_secs(),
                    "Event streams still open after grace period"
                );
                Drain::Expired
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_observe_trigger() {
        let shutdown = Shutdown::new(Duration::from_secs(1));
        let mut a = shutdown.subscribe();
        let mut b = shutdown.subscribe();

        shutdown.trigger();
        assert!(a.recv().await.is_ok());
        assert!(b.recv().await.is_ok());
    }

    #[test]
    fn trigger_without_subscribers_is_harmless() {
        Shutdown::new(Duration::ZERO).trigger();
    }

    #[test]
    fn grace_comes_from_timeouts() {
        let shutdown = Shutdown::from_config(&TimeoutConfig::default());
        assert_eq!(shutdown.grace(), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn drain_returns_server_result() {
        let shutdown = Shutdown::new(Duration::from_secs(5));
        let mut rx = shutdown.subscribe();
        let server = async move {
            let _ = rx.recv().await;
            "stopped"
        };

        shutdown.trigger();
        assert_eq!(shutdown.drain(server).await, Drain::Finished("stopped"));
    }

    #[tokio::test]
    async fn drain_gives_up_on_open_streams() {
        let shutdown = Shutdown::new(Duration::from_millis(50));
        let server = std::future::pending::<()>();
        assert_eq!(shutdown.drain(server).await, Drain::Expired);
    }
}
