//! Routes inbound messages to the vote manager and the fixed replies.
//!
//! One dispatcher task owns the [`VoteManager`]; polling and the webhook
//! feed it through a bounded channel, so vote state is only ever touched by
//! one update at a time.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{broadcast, mpsc};

use court_store::RecordStore;
use court_types::InboundMessage;
use court_votes::{Notifier, VoteEvent, VoteManager};

use crate::commands::Command;
use crate::metrics::BotMetrics;
use crate::records::records_reply;
use crate::text;
use crate::NodeError;

/// Capacity of the update channel between the transports and the dispatcher.
pub const UPDATE_CHANNEL_CAPACITY: usize = 256;

pub struct Dispatcher {
    manager: VoteManager,
    notifier: Arc<dyn Notifier>,
    store: Arc<dyn RecordStore>,
    metrics: Arc<BotMetrics>,
}

impl Dispatcher {
    pub fn new(
        manager: VoteManager,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn RecordStore>,
        metrics: Arc<BotMetrics>,
    ) -> Self {
        Self {
            manager,
            notifier,
            store,
            metrics,
        }
    }

    pub fn manager(&self) -> &VoteManager {
        &self.manager
    }

    /// Handle one message. Plain text that is not a reply is ignored.
    pub async fn handle(&mut self, msg: &InboundMessage) -> Result<Vec<VoteEvent>, NodeError> {
        let events = match Command::parse(msg) {
            Some(command) => {
                tracing::debug!(
                    command = command.name(),
                    chat = %msg.chat_id,
                    sender = %msg.sender.id,
                    "command received"
                );
                self.metrics
                    .commands
                    .with_label_values(&[command.name()])
                    .inc();
                self.run_command(msg, command).await?
            }
            None if !msg.is_command() && msg.reply_to.is_some() => {
                self.manager.handle_reply_nomination(msg).await?
            }
            None => Vec::new(),
        };

        self.metrics.observe(&events);
        self.metrics
            .active_votes
            .set(i64::from(self.manager.active().is_some()));
        Ok(events)
    }

    async fn run_command(
        &mut self,
        msg: &InboundMessage,
        command: Command,
    ) -> Result<Vec<VoteEvent>, NodeError> {
        let name = command.name();
        match command {
            Command::Help => self.reply(msg, text::HELP_MESSAGE).await,
            Command::Rules => self.reply(msg, text::RULES_MESSAGE).await,
            Command::Records(target) => {
                let reply =
                    records_reply(self.store.as_ref(), self.manager.roster(), target.as_deref());
                self.reply(msg, &reply).await
            }
            Command::Nominate { target: None, .. } => self.reply(msg, &text::usage(name)).await,
            Command::Nominate {
                kind,
                target: Some(target),
            } => Ok(self.manager.initiate(msg, &target, kind, true).await?),
            Command::Ballot { agree } => Ok(self.manager.cast_ballot(msg, agree).await?),
            Command::Status => Ok(self.manager.status(msg).await?),
        }
    }

    async fn reply(&self, msg: &InboundMessage, text: &str) -> Result<Vec<VoteEvent>, NodeError> {
        self.notifier
            .send(msg.chat_id, text)
            .await
            .map_err(court_votes::VoteError::from)?;
        Ok(Vec::new())
    }

    /// Consume messages until the channel closes or shutdown is signalled.
    pub async fn run(
        mut self,
        mut updates: mpsc::Receiver<InboundMessage>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        tracing::info!("dispatcher started");
        loop {
            let msg = tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    tracing::info!("dispatcher shutting down");
                    break;
                }
                msg = updates.recv() => match msg {
                    Some(msg) => msg,
                    None => {
                        tracing::info!("update channel closed, dispatcher stopping");
                        break;
                    }
                },
            };

            let start = Instant::now();
            if let Err(e) = self.handle(&msg).await {
                self.metrics.handler_errors.inc();
                tracing::error!(
                    chat = %msg.chat_id,
                    message = %msg.message_id,
                    error = %e,
                    "failed to handle message"
                );
                if let Err(e) = self.notifier.send(msg.chat_id, text::HANDLER_ERROR).await {
                    tracing::warn!(error = %e, "could not report handler failure");
                }
            }
            self.metrics
                .handle_time_ms
                .observe(start.elapsed().as_secs_f64() * 1000.0);
        }
    }
}
