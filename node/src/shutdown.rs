//! Stopping the court bot.
//!
//! [`CourtBot::start`](crate::bot::CourtBot::start) hands one receiver each to
//! the update dispatcher, the `getUpdates` poller and the webhook server. A
//! signal, [`CourtBot::stop`](crate::bot::CourtBot::stop) or a server that
//! fails to bind fires the same broadcast.

use tokio::signal;
use tokio::sync::broadcast;

/// One-shot stop signal shared by the bot's background tasks.
pub struct ShutdownController {
    tx: broadcast::Sender<()>,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver for one task. Take it before spawning the task, since a
    /// receiver only sees stops fired after it was created.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Tell every task to stop. Harmless when nothing is subscribed.
    pub fn shutdown(&self) {
        let _ = self.tx.send(());
    }

    /// Block the bot's `run` until SIGINT or SIGTERM arrives, then stop the
    /// tasks. A signal whose handler cannot be installed is logged and ignored.
    pub async fn wait_for_signal(&self) {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::warn!(error = %e, "could not listen for SIGINT");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "could not listen for SIGTERM");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => { tracing::info!("received SIGINT, shutting down"); }
            _ = terminate => { tracing::info!("received SIGTERM, shutting down"); }
        }

        self.shutdown();
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shutdown_reaches_every_subscriber() {
        let controller = ShutdownController::new();
        let mut dispatcher = controller.subscribe();
        let mut server = controller.subscribe();
        controller.shutdown();
        assert!(dispatcher.recv().await.is_ok());
        assert!(server.recv().await.is_ok());
    }

    #[tokio::test]
    async fn late_subscribers_miss_earlier_shutdown() {
        let controller = ShutdownController::new();
        controller.shutdown();
        let mut rx = controller.subscribe();
        assert!(rx.try_recv().is_err());
    }
}
