//! Transport-neutral view of an incoming chat message.

use crate::{ChatId, MessageId, UserId, VoterId};
use serde::{Deserialize, Serialize};

/// The author of a message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub id: VoterId,
    pub username: Option<String>,
    pub first_name: String,
}

impl Sender {
    /// The roster key for this sender: `@username`, or `@first_name` when the
    /// account has no username.
    pub fn handle(&self) -> UserId {
        match self.username.as_deref() {
            Some(username) if !username.trim().is_empty() => UserId::new(username),
            _ => UserId::new(&self.first_name),
        }
    }
}

/// A text message received in a chat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub sender: Sender,
    pub text: String,
    /// Author of the message this one replies to, if it is a reply.
    pub reply_to: Option<Sender>,
}

impl InboundMessage {
    /// The first whitespace-separated token of the text.
    pub fn command(&self) -> &str {
        self.text.split_whitespace().next().unwrap_or("")
    }

    /// Every token after the command.
    pub fn args(&self) -> Vec<&str> {
        self.text.split_whitespace().skip(1).collect()
    }

    pub fn is_command(&self) -> bool {
        self.text.trim_start().starts_with('/')
    }
}
