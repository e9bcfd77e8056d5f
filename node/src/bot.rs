//! The court bot: wires storage, transport, the dispatcher and the HTTP
//! server together and runs them until shutdown.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use court_store::RecordStore;
use court_store_lmdb::{LmdbEnvironment, LmdbRecordStore};
use court_telegram::TelegramClient;
use court_votes::VoteManager;

use crate::config::{BotConfig, BotMode};
use crate::dispatcher::{Dispatcher, UPDATE_CHANNEL_CAPACITY};
use crate::metrics::BotMetrics;
use crate::polling::poll_updates;
use crate::server::{self, ServerState};
use crate::shutdown::ShutdownController;
use crate::NodeError;

/// Timeout for waiting on background tasks during shutdown.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Open the record store under `data_dir`.
pub fn open_record_store(data_dir: &Path) -> Result<LmdbRecordStore, NodeError> {
    let env = LmdbEnvironment::open_default(data_dir)?;
    Ok(env.record_store())
}

pub struct CourtBot {
    config: BotConfig,
    shutdown: Arc<ShutdownController>,
    task_handles: Vec<JoinHandle<()>>,
}

impl CourtBot {
    pub fn new(config: BotConfig) -> Result<Self, NodeError> {
        config.validate()?;
        Ok(Self {
            config,
            shutdown: Arc::new(ShutdownController::new()),
            task_handles: Vec::new(),
        })
    }

    /// Handle for triggering shutdown from outside.
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.shutdown)
    }

    /// Start every task, then block until SIGINT/SIGTERM and stop them.
    pub async fn run(mut self) -> Result<(), NodeError> {
        if let Err(e) = self.start().await {
            self.stop().await;
            return Err(e);
        }
        self.shutdown.wait_for_signal().await;
        self.stop().await;
        Ok(())
    }

    /// Spawn the dispatcher, the HTTP server and (in polling mode) the poller.
    pub async fn start(&mut self) -> Result<(), NodeError> {
        let config = &self.config;
        tracing::info!(
            mode = %config.mode,
            port = config.port,
            data_dir = %config.data_dir.display(),
            roster = config.roster.len(),
            "court bot starting"
        );

        let store: Arc<dyn RecordStore> = Arc::new(open_record_store(&config.data_dir)?);
        let store_available = match store.all_user_records() {
            Ok(records) => {
                tracing::info!(records = records.len(), "record store opened");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "record store unreadable");
                false
            }
        };

        let client = Arc::new(TelegramClient::with_base(
            config.api_base_url.clone(),
            config.bot_token.clone(),
        ));
        let metrics = Arc::new(BotMetrics::new());
        let manager = VoteManager::new(client.clone(), store.clone(), config.roster());
        let dispatcher = Dispatcher::new(manager, client.clone(), store, metrics.clone());

        let (updates_tx, updates_rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);

        // Subscribe everything before any task can observe a shutdown.
        let dispatcher_shutdown = self.shutdown.subscribe();
        let server_shutdown = self.shutdown.subscribe();
        let poller_shutdown = self.shutdown.subscribe();

        self.task_handles.push(tokio::spawn(
            dispatcher.run(updates_rx, dispatcher_shutdown),
        ));

        let state = Arc::new(ServerState {
            updates: updates_tx.clone(),
            metrics: metrics.clone(),
            store_available,
            enable_metrics: config.enable_metrics,
        });
        let port = config.port;
        let shutdown = Arc::clone(&self.shutdown);
        self.task_handles.push(tokio::spawn(async move {
            if let Err(e) = server::serve(port, state, server_shutdown).await {
                tracing::error!(error = %e, "HTTP server failed");
                shutdown.shutdown();
            }
        }));

        match config.mode {
            BotMode::Polling => {
                self.task_handles.push(tokio::spawn(poll_updates(
                    client,
                    config.poll_timeout_secs,
                    updates_tx,
                    metrics,
                    poller_shutdown,
                )));
            }
            BotMode::Webhook => match config.webhook_url() {
                Some(url) => {
                    if let Err(e) = client.set_webhook(&url).await {
                        tracing::error!(
                            error = %e,
                            url,
                            "webhook registration failed, serving anyway"
                        );
                    }
                }
                None => tracing::warn!(
                    "no external URL configured, webhook not registered; \
                     updates arrive only if it was registered before"
                ),
            },
        }

        tracing::info!("court bot started");
        Ok(())
    }

    /// Signal every task and wait for them to finish.
    pub async fn stop(&mut self) {
        tracing::info!("court bot stopping");
        self.shutdown.shutdown();

        for handle in self.task_handles.drain(..) {
            match tokio::time::timeout(SHUTDOWN_TIMEOUT, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!(error = %e, "task panicked during shutdown"),
                Err(_) => tracing::warn!("task did not stop within the shutdown timeout"),
            }
        }
        tracing::info!("court bot stopped");
    }
}
