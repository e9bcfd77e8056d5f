//! A single nomination and its ballots.
//!
//! The quorum is fixed for a three-member roster: two agreeing ballots pass,
//! two rejecting ballots fail, and a vote that is still open eight hours after
//! it started fails on timeout.

use std::collections::HashMap;

use court_types::{ChatId, Timestamp, UserId, VoteId, VoteKind, VoterId};

use crate::VoteError;

/// How long a vote stays open, in seconds.
pub const VOTE_DURATION_SECS: u64 = 8 * 60 * 60;

/// Agreeing ballots needed to pass.
pub const PASS_THRESHOLD: usize = 2;

/// Rejecting ballots needed to fail.
pub const FAIL_THRESHOLD: usize = 2;

/// Number of eligible voters, initiator included.
pub const ELECTORATE_SIZE: usize = 3;

const SECS_PER_HOUR: f64 = 3600.0;

/// Result of casting a ballot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastResult {
    /// First ballot from this voter.
    Accepted,
    /// The voter changed their ballot.
    Switched,
    /// The voter repeated their existing ballot.
    Unchanged,
}

/// One in-flight nomination.
#[derive(Clone, Debug)]
pub struct Vote {
    id: VoteId,
    kind: VoteKind,
    target_user: UserId,
    initiator: VoterId,
    chat_id: ChatId,
    start_time: Timestamp,
    /// Latest ballot per voter: `true` agrees, `false` rejects.
    ballots: HashMap<VoterId, bool>,
}

impl Vote {
    /// Open a vote with no ballots.
    pub fn new(
        id: VoteId,
        kind: VoteKind,
        target_user: UserId,
        initiator: VoterId,
        chat_id: ChatId,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            kind,
            target_user,
            initiator,
            chat_id,
            start_time: now,
            ballots: HashMap::new(),
        }
    }

    pub fn id(&self) -> VoteId {
        self.id
    }

    pub fn kind(&self) -> VoteKind {
        self.kind
    }

    pub fn target_user(&self) -> &UserId {
        &self.target_user
    }

    pub fn initiator(&self) -> VoterId {
        self.initiator
    }

    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    pub fn start_time(&self) -> Timestamp {
        self.start_time
    }

    /// The voter's current ballot, if any.
    pub fn ballot_of(&self, voter: VoterId) -> Option<bool> {
        self.ballots.get(&voter).copied()
    }

    /// Record or replace a voter's ballot.
    ///
    /// Fails with [`VoteError::Expired`] once the time budget is spent.
    pub fn cast(
        &mut self,
        voter: VoterId,
        agree: bool,
        now: Timestamp,
    ) -> Result<CastResult, VoteError> {
        if self.is_expired(now) {
            return Err(VoteError::Expired(self.id));
        }
        let result = match self.ballots.insert(voter, agree) {
            None => CastResult::Accepted,
            Some(previous) if previous == agree => CastResult::Unchanged,
            Some(_) => CastResult::Switched,
        };
        Ok(result)
    }

    pub fn agree_count(&self) -> usize {
        self.ballots.values().filter(|agree| **agree).count()
    }

    pub fn reject_count(&self) -> usize {
        self.ballots.values().filter(|agree| !**agree).count()
    }

    /// Number of distinct voters who have cast a ballot.
    pub fn ballot_count(&self) -> usize {
        self.ballots.len()
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.start_time.has_expired(VOTE_DURATION_SECS, now)
    }

    pub fn should_pass(&self) -> bool {
        self.agree_count() >= PASS_THRESHOLD
    }

    pub fn should_fail(&self, now: Timestamp) -> bool {
        self.reject_count() >= FAIL_THRESHOLD || self.is_expired(now)
    }

    /// Every eligible voter has cast a ballot.
    pub fn is_complete(&self) -> bool {
        self.ballot_count() == ELECTORATE_SIZE
    }

    /// Hours left before the vote expires, floored at zero.
    pub fn time_remaining(&self, now: Timestamp) -> f64 {
        let elapsed = self.start_time.elapsed_since(now);
        let remaining = VOTE_DURATION_SECS.saturating_sub(elapsed);
        remaining as f64 / SECS_PER_HOUR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: u64 = 1_700_000_000;

    fn ts(offset: u64) -> Timestamp {
        Timestamp::new(START + offset)
    }

    fn make_vote() -> Vote {
        Vote::new(
            VoteId(1),
            VoteKind::Bailan,
            UserId::new("@maxbillchung"),
            VoterId(1),
            ChatId(-100),
            ts(0),
        )
    }

    #[test]
    fn new_vote_has_no_ballots() {
        let vote = make_vote();
        assert_eq!(vote.kind(), VoteKind::Bailan);
        assert_eq!(vote.target_user(), &UserId::new("@maxbillchung"));
        assert_eq!(vote.initiator(), VoterId(1));
        assert_eq!(vote.chat_id(), ChatId(-100));
        assert_eq!(vote.agree_count(), 0);
        assert_eq!(vote.reject_count(), 0);
        assert!(!vote.is_complete());
    }

    #[test]
    fn agree_ballots_accumulate() {
        let mut vote = make_vote();
        vote.cast(VoterId(1), true, ts(1)).unwrap();
        vote.cast(VoterId(2), true, ts(2)).unwrap();
        assert_eq!(vote.agree_count(), 2);
        assert_eq!(vote.reject_count(), 0);
    }

    #[test]
    fn switching_moves_the_ballot() {
        let mut vote = make_vote();
        assert_eq!(vote.cast(VoterId(1), true, ts(1)).unwrap(), CastResult::Accepted);
        assert_eq!(vote.cast(VoterId(1), false, ts(2)).unwrap(), CastResult::Switched);
        assert_eq!(vote.agree_count(), 0);
        assert_eq!(vote.reject_count(), 1);
        assert_eq!(vote.ballot_of(VoterId(1)), Some(false));
    }

    #[test]
    fn repeating_a_ballot_is_unchanged() {
        let mut vote = make_vote();
        vote.cast(VoterId(2), false, ts(1)).unwrap();
        assert_eq!(vote.cast(VoterId(2), false, ts(2)).unwrap(), CastResult::Unchanged);
        assert_eq!(vote.reject_count(), 1);
    }

    #[test]
    fn passes_exactly_at_second_agree() {
        let mut vote = make_vote();
        assert!(!vote.should_pass());
        vote.cast(VoterId(1), true, ts(1)).unwrap();
        assert!(!vote.should_pass());
        vote.cast(VoterId(2), true, ts(2)).unwrap();
        assert!(vote.should_pass());
    }

    #[test]
    fn fails_exactly_at_second_reject() {
        let mut vote = make_vote();
        vote.cast(VoterId(2), false, ts(1)).unwrap();
        assert!(!vote.should_fail(ts(1)));
        vote.cast(VoterId(3), false, ts(2)).unwrap();
        assert!(vote.should_fail(ts(2)));
    }

    #[test]
    fn expires_at_eight_hours() {
        let vote = make_vote();
        assert!(!vote.is_expired(ts(VOTE_DURATION_SECS - 1)));
        assert!(vote.is_expired(ts(VOTE_DURATION_SECS)));
        assert!(vote.should_fail(ts(VOTE_DURATION_SECS)));
    }

    #[test]
    fn cast_on_expired_vote_is_an_error() {
        let mut vote = make_vote();
        let result = vote.cast(VoterId(2), true, ts(9 * 3600));
        assert!(matches!(result, Err(VoteError::Expired(VoteId(1)))));
        assert_eq!(vote.ballot_count(), 0);
    }

    #[test]
    fn complete_with_three_distinct_voters() {
        let mut vote = make_vote();
        vote.cast(VoterId(1), true, ts(1)).unwrap();
        vote.cast(VoterId(2), true, ts(2)).unwrap();
        assert!(!vote.is_complete());
        vote.cast(VoterId(3), false, ts(3)).unwrap();
        assert!(vote.is_complete());
    }

    #[test]
    fn time_remaining_counts_down_and_floors() {
        let vote = make_vote();
        assert!((vote.time_remaining(ts(0)) - 8.0).abs() < f64::EPSILON);
        assert!((vote.time_remaining(ts(1800)) - 7.5).abs() < f64::EPSILON);
        assert_eq!(vote.time_remaining(ts(10 * 3600)), 0.0);
    }
}
