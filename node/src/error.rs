use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("vote error: {0}")]
    Vote(#[from] court_votes::VoteError),

    #[error("store error: {0}")]
    Store(#[from] court_store::StoreError),

    #[error("storage backend error: {0}")]
    Lmdb(#[from] court_store_lmdb::LmdbError),

    #[error("Telegram error: {0}")]
    Telegram(#[from] court_telegram::TelegramError),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP server error: {0}")]
    Server(String),

    #[error("metrics error: {0}")]
    Metrics(String),
}
