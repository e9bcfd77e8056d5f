use court_store::StoreError;
use court_types::VoteId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoteError {
    /// A ballot reached a vote past its time budget. The manager checks
    /// expiry before casting, so this only surfaces on direct `Vote` use.
    #[error("vote {0} has expired")]
    Expired(VoteId),

    #[error("notifier error: {0}")]
    Notify(#[from] NotifyError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Failure to deliver or delete a chat message.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("chat service rejected the request: {0}")]
    Rejected(String),

    #[error("chat service unreachable: {0}")]
    Unreachable(String),
}
