//! Shutdown coordination for the proxy.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("in-flight requests did not finish within {0:?}")]
    GracePeriodExceeded(Duration),

    #[error("server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that all long-running tasks can subscribe to.
#[derive(Debug)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// A future that resolves once `trigger` is called.
    pub fn signalled(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.subscribe();
        async move {
            let _ = rx.recv().await;
        }
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of tasks still listening for the signal.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for a draining server task, aborting it once `grace` elapses.
pub async fn drain(
    mut server: JoinHandle<std::io::Result<()>>,
    grace: Duration,
) -> Result<(), ShutdownError> {
    match tokio::time::timeout(grace, &mut server).await {
        Ok(joined) => Ok(joined??),
        Err(_) => {
            server.abort();
            tracing::error!(grace = ?grace, "Grace period exceeded, forcing shutdown");
            Err(ShutdownError::GracePeriodExceeded(grace))
        }
    }
}
