//! The part of the Bot API update schema the bot reads.
//!
//! Unknown fields are ignored, so full API payloads deserialize cleanly.

use court_types::{ChatId, InboundMessage, MessageId, Sender, VoterId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub reply_to_message: Option<Box<Message>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

impl From<&User> for Sender {
    fn from(user: &User) -> Self {
        Sender {
            id: VoterId(user.id),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
        }
    }
}

impl Message {
    /// Convert to the transport-neutral form. Messages without text or
    /// without an author (channel posts, service messages) yield `None`.
    pub fn to_inbound(&self) -> Option<InboundMessage> {
        let text = self.text.as_ref()?;
        let from = self.from.as_ref()?;
        Some(InboundMessage {
            chat_id: ChatId(self.chat.id),
            message_id: MessageId(self.message_id),
            sender: from.into(),
            text: text.clone(),
            reply_to: self
                .reply_to_message
                .as_ref()
                .and_then(|m| m.from.as_ref())
                .map(Sender::from),
        })
    }
}

impl Update {
    pub fn into_inbound(self) -> Option<InboundMessage> {
        self.message.as_ref().and_then(Message::to_inbound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use court_types::UserId;

    const REPLY_UPDATE: &str = r#"{
        "update_id": 900,
        "message": {
            "message_id": 42,
            "date": 1700000000,
            "chat": {"id": -1001, "type": "supergroup", "title": "court"},
            "from": {"id": 1, "is_bot": false, "first_name": "Mao", "username": "Amao62626"},
            "text": "白爛+1",
            "reply_to_message": {
                "message_id": 41,
                "chat": {"id": -1001, "type": "supergroup"},
                "from": {"id": 3, "is_bot": false, "first_name": "Lin", "username": "yanglin1112"},
                "text": "hello"
            }
        }
    }"#;

    #[test]
    fn reply_update_converts() {
        let update: Update = serde_json::from_str(REPLY_UPDATE).unwrap();
        assert_eq!(update.update_id, 900);

        let msg = update.into_inbound().unwrap();
        assert_eq!(msg.chat_id, ChatId(-1001));
        assert_eq!(msg.message_id, MessageId(42));
        assert_eq!(msg.sender.id, VoterId(1));
        assert_eq!(msg.text, "白爛+1");
        let replied = msg.reply_to.unwrap();
        assert_eq!(replied.handle(), UserId::new("@yanglin1112"));
    }

    #[test]
    fn update_without_message_has_no_inbound() {
        let update: Update = serde_json::from_str(r#"{"update_id": 1}"#).unwrap();
        assert!(update.message.is_none());
        assert!(update.into_inbound().is_none());
    }

    #[test]
    fn non_text_message_is_skipped() {
        let json = r#"{
            "update_id": 2,
            "message": {
                "message_id": 5,
                "chat": {"id": -1, "type": "group"},
                "from": {"id": 1, "first_name": "Mao"},
                "sticker": {"file_id": "abc"}
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        assert!(update.into_inbound().is_none());
    }

    #[test]
    fn sender_without_username() {
        let user = User {
            id: 7,
            is_bot: false,
            first_name: "Guest".into(),
            username: None,
        };
        assert_eq!(Sender::from(&user).handle(), UserId::new("@Guest"));
    }
}
