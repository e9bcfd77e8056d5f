//! HTTP client for the Telegram Bot API.

use crate::error::TelegramError;
use crate::types::Update;

use async_trait::async_trait;
use court_types::{ChatId, MessageId};
use court_votes::{Notifier, NotifyError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Public Bot API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Default timeout for ordinary requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Slack added on top of the long-poll timeout for `getUpdates`.
const LONG_POLL_SLACK: Duration = Duration::from_secs(10);

/// Every Bot API response envelope. Absent fields decode as `None`.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<i64>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T, TelegramError> {
        if !self.ok {
            return Err(TelegramError::Api {
                code: self.error_code.unwrap_or_default(),
                description: self.description.unwrap_or_default(),
            });
        }
        self.result
            .ok_or_else(|| TelegramError::InvalidResponse("ok response without result".into()))
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
}

#[derive(Serialize)]
struct DeleteMessage {
    chat_id: i64,
    message_id: i64,
}

#[derive(Serialize)]
struct GetUpdates<'a> {
    offset: i64,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

#[derive(Serialize)]
struct SetWebhook<'a> {
    url: &'a str,
}

/// Client for one bot token.
///
/// Every method is a JSON `POST {api_base}/bot{token}/{method}`.
pub struct TelegramClient {
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
    api_base: String,
    token: String,
}

impl TelegramClient {
    /// Create a client against a custom API base URL.
    pub fn with_base(api_base: impl Into<String>, token: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    async fn call<B, T>(
        &self,
        method: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<T, TelegramError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http_client
            .post(self.method_url(method))
            .timeout(timeout)
            .json(body)
            .send()
            .await?;

        // The API reports failures in the envelope with a non-2xx status, so
        // decode before looking at the status code.
        let status = response.status();
        let envelope: ApiResponse<T> = response.json().await.map_err(|e| {
            TelegramError::InvalidResponse(format!("{method}: HTTP {status}: {e}"))
        })?;
        envelope.into_result()
    }

    /// `sendMessage`
    pub async fn send_message(&self, chat: ChatId, text: &str) -> Result<(), TelegramError> {
        let body = SendMessage {
            chat_id: chat.0,
            text,
        };
        let _: serde_json::Value = self.call("sendMessage", &body, DEFAULT_TIMEOUT).await?;
        Ok(())
    }

    /// `deleteMessage`. Fails when the bot lacks the rights to delete.
    pub async fn delete_message(
        &self,
        chat: ChatId,
        message: MessageId,
    ) -> Result<(), TelegramError> {
        let body = DeleteMessage {
            chat_id: chat.0,
            message_id: message.0,
        };
        let _: bool = self.call("deleteMessage", &body, DEFAULT_TIMEOUT).await?;
        Ok(())
    }

    /// `getUpdates` long poll. Returns once updates arrive or `timeout_secs`
    /// passes.
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let body = GetUpdates {
            offset,
            timeout: timeout_secs,
            allowed_updates: &["message"],
        };
        let timeout = Duration::from_secs(timeout_secs) + LONG_POLL_SLACK;
        self.call("getUpdates", &body, timeout).await
    }

    /// `setWebhook`
    pub async fn set_webhook(&self, url: &str) -> Result<(), TelegramError> {
        let _: bool = self
            .call("setWebhook", &SetWebhook { url }, DEFAULT_TIMEOUT)
            .await?;
        tracing::info!(url, "webhook registered");
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramClient {
    async fn send(&self, chat: ChatId, text: &str) -> Result<(), NotifyError> {
        Ok(self.send_message(chat, text).await?)
    }

    async fn delete(&self, chat: ChatId, message: MessageId) -> Result<(), NotifyError> {
        Ok(self.delete_message(chat, message).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_url_joins_base_token_and_method() {
        let client = TelegramClient::with_base("http://localhost:8081/", "123:abc");
        assert_eq!(
            client.method_url("sendMessage"),
            "http://localhost:8081/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn ok_envelope_yields_result() {
        let json = r#"{"ok": true, "result": true}"#;
        let resp: ApiResponse<bool> = serde_json::from_str(json).unwrap();
        assert!(resp.into_result().unwrap());
    }

    #[test]
    fn error_envelope_yields_api_error() {
        let json = r#"{"ok": false, "error_code": 400,
            "description": "Bad Request: message to delete not found"}"#;
        let resp: ApiResponse<bool> = serde_json::from_str(json).unwrap();
        match resp.into_result() {
            Err(TelegramError::Api { code, description }) => {
                assert_eq!(code, 400);
                assert!(description.contains("not found"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn updates_envelope_decodes() {
        let json = r#"{"ok": true, "result": [
            {"update_id": 10, "message": {"message_id": 1, "chat": {"id": -5, "type": "group"},
             "from": {"id": 2, "first_name": "Max"}, "text": "/status"}}
        ]}"#;
        let resp: ApiResponse<Vec<Update>> = serde_json::from_str(json).unwrap();
        let updates = resp.into_result().unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].update_id, 10);
    }

    fn decode<T: DeserializeOwned>(json: &str) -> Result<T, TelegramError> {
        serde_json::from_str::<ApiResponse<T>>(json)
            .map_err(|e| TelegramError::InvalidResponse(e.to_string()))?
            .into_result()
    }

    #[test]
    fn error_envelope_decodes_for_result_types_without_default() {
        let json = r#"{"ok": false, "error_code": 502, "description": "Bad Gateway"}"#;
        assert!(matches!(
            decode::<Update>(json),
            Err(TelegramError::Api { code: 502, .. })
        ));
    }

    #[test]
    fn ok_without_result_is_invalid() {
        let resp: ApiResponse<bool> = serde_json::from_str(r#"{"ok": true}"#).unwrap();
        assert!(matches!(
            resp.into_result(),
            Err(TelegramError::InvalidResponse(_))
        ));
    }
}
