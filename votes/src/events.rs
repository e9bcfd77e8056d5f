//! What a manager operation did, for logging, metrics and tests.

use court_types::{UserId, UserRecord, VoteId, VoteKind, VoterId};

/// Why a vote failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailReason {
    /// Rejecting ballots reached the threshold.
    Rejected,
    /// The time budget ran out before a decision.
    Expired,
    /// All voters cast a ballot without a threshold firing and the last
    /// ballot was a rejection.
    TieBreak,
}

impl FailReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rejected => "rejected",
            Self::Expired => "expired",
            Self::TieBreak => "tie_break",
        }
    }
}

/// Why a request was turned down without touching state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Refusal {
    /// The nominated user is not on the roster.
    UnknownTarget(String),
    /// Another vote is still open.
    VoteInProgress(VoteId),
    /// There is nothing to vote on or report.
    NoActiveVote,
}

/// A state change or reply produced by the vote manager.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoteEvent {
    Started {
        id: VoteId,
        kind: VoteKind,
        target: UserId,
        initiator: VoterId,
    },
    BallotCast {
        id: VoteId,
        voter: VoterId,
        agree: bool,
        agree_count: usize,
        reject_count: usize,
    },
    Passed {
        id: VoteId,
        kind: VoteKind,
        target: UserId,
        record: UserRecord,
    },
    Failed {
        id: VoteId,
        kind: VoteKind,
        target: UserId,
        reason: FailReason,
    },
    /// An expired vote was found and cleared.
    Expired { id: VoteId },
    StatusReported { id: VoteId },
    Refused(Refusal),
}
