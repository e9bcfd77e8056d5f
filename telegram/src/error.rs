use court_votes::NotifyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("HTTP request to the Bot API failed: {0}")]
    RequestFailed(String),

    #[error("Bot API unreachable: {0}")]
    Unreachable(String),

    #[error("invalid response from the Bot API: {0}")]
    InvalidResponse(String),

    /// The API answered with `ok: false`.
    #[error("Bot API error {code}: {description}")]
    Api { code: i64, description: String },
}

impl From<reqwest::Error> for TelegramError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Unreachable(format!("request timed out: {e}"))
        } else if e.is_connect() {
            Self::Unreachable(format!("connection failed: {e}"))
        } else if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::RequestFailed(e.to_string())
        }
    }
}

impl From<TelegramError> for NotifyError {
    fn from(e: TelegramError) -> Self {
        match e {
            TelegramError::Unreachable(msg) => NotifyError::Unreachable(msg),
            TelegramError::Api { .. } => NotifyError::Rejected(e.to_string()),
            other => NotifyError::RequestFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_to_rejected() {
        let err = TelegramError::Api {
            code: 400,
            description: "Bad Request: message can't be deleted".into(),
        };
        assert!(matches!(NotifyError::from(err), NotifyError::Rejected(_)));
    }

    #[test]
    fn unreachable_stays_unreachable() {
        let err = TelegramError::Unreachable("connection failed".into());
        assert!(matches!(NotifyError::from(err), NotifyError::Unreachable(_)));
    }
}
