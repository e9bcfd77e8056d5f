//! Abstract storage traits for the court bot.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits.

pub mod error;
pub mod record;

pub use error::StoreError;
pub use record::{apply_penalty, sort_by_recency, RecordStore};
