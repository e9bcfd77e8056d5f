//! Fundamental types for the court bot.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! user and chat identifiers, timestamps, vote kinds, penalty records, the roster
//! and the transport-neutral inbound message.

pub mod ids;
pub mod kind;
pub mod message;
pub mod record;
pub mod roster;
pub mod time;

pub use ids::{ChatId, MessageId, UserId, VoteId, VoterId};
pub use kind::VoteKind;
pub use message::{InboundMessage, Sender};
pub use record::UserRecord;
pub use roster::Roster;
pub use time::Timestamp;
