//! Outbound chat seam.

use async_trait::async_trait;
use court_types::{ChatId, MessageId};

use crate::NotifyError;

/// Delivers messages to a chat.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send `text` to `chat`.
    async fn send(&self, chat: ChatId, text: &str) -> Result<(), NotifyError>;

    /// Delete a message. Callers treat failures (usually missing admin
    /// rights) as non-fatal.
    async fn delete(&self, chat: ChatId, message: MessageId) -> Result<(), NotifyError>;
}
