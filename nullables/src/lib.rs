//! Nullable infrastructure for deterministic testing.
//!
//! The vote engine reaches the outside world through three seams: a clock,
//! a notifier and a record store. This crate provides in-memory versions of
//! each that can be steered and inspected from tests:
//! - time only moves when the test advances it
//! - sent and deleted messages are recorded instead of delivered
//! - records live in a map and every write is counted
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod notifier;
pub mod store;

pub use clock::NullClock;
pub use notifier::{NullNotifier, SentMessage};
pub use store::NullRecordStore;
