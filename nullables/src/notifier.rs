//! Nullable notifier: records outgoing chat traffic instead of sending it.

use async_trait::async_trait;
use court_types::{ChatId, MessageId};
use court_votes::{Notifier, NotifyError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// A message the code under test tried to send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentMessage {
    pub chat: ChatId,
    pub text: String,
}

/// An in-memory [`Notifier`].
///
/// Sends succeed until [`NullNotifier::fail_sends`] is called. Deletes succeed
/// unless [`NullNotifier::fail_deletes`] was called, in which case they are
/// still recorded but return an error.
#[derive(Default)]
pub struct NullNotifier {
    sent: Mutex<Vec<SentMessage>>,
    deleted: Mutex<Vec<(ChatId, MessageId)>>,
    fail_deletes: AtomicBool,
    fail_sends: AtomicBool,
}

impl NullNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent delete fail, as when the bot lacks admin rights.
    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    /// Make every subsequent send fail.
    pub fn fail_sends(&self) {
        self.fail_sends.store(true, Ordering::SeqCst);
    }

    /// Everything sent so far, in order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Just the texts sent so far, in order.
    pub fn texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.text.clone())
            .collect()
    }

    /// The most recent text sent, if any.
    pub fn last_text(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|m| m.text.clone())
    }

    /// Every delete attempted so far, in order.
    pub fn deleted(&self) -> Vec<(ChatId, MessageId)> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for NullNotifier {
    async fn send(&self, chat: ChatId, text: &str) -> Result<(), NotifyError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(NotifyError::Unreachable("null notifier send failure".into()));
        }
        self.sent.lock().unwrap().push(SentMessage {
            chat,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn delete(&self, chat: ChatId, message: MessageId) -> Result<(), NotifyError> {
        self.deleted.lock().unwrap().push((chat, message));
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(NotifyError::Rejected("message can't be deleted".into()));
        }
        Ok(())
    }
}
