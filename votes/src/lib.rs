//! Vote lifecycle engine for the court bot.
//!
//! A roster member nominates another for a penalty (bailan / warning) or for
//! a pardon. The group votes with a fixed 2-of-3 quorum: two agreeing ballots
//! pass the vote, two rejecting ballots (or eight hours without a decision)
//! fail it. At most one vote is active per [`VoteManager`].
//!
//! The engine talks to the outside world through two seams: a [`Notifier`]
//! that delivers chat messages and a [`court_store::RecordStore`] that keeps
//! the per-user tally.

pub mod error;
pub mod events;
pub mod manager;
pub mod nomination;
pub mod notifier;
pub mod vote;
pub mod wording;

pub use error::{NotifyError, VoteError};
pub use events::{FailReason, Refusal, VoteEvent};
pub use manager::VoteManager;
pub use nomination::detect_nomination;
pub use notifier::Notifier;
pub use vote::{
    CastResult, Vote, ELECTORATE_SIZE, FAIL_THRESHOLD, PASS_THRESHOLD, VOTE_DURATION_SECS,
};
