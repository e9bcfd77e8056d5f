//! The vote manager: owns the single active vote and drives its resolution.
//!
//! Lifecycle:
//! - Idle → `initiate` with a roster target → Active (initiator auto-agrees).
//! - Active → ballot reaching two agrees → Idle, record written, pass announced.
//! - Active → ballot reaching two rejects → Idle, fail announced, no write.
//! - Active → all three ballots in without a threshold → decided by the last
//!   ballot's polarity.
//! - Active but expired at the start of any operation → Idle with an expiry
//!   notice, then the operation continues against the idle state.
//!
//! Every operation reports user-facing problems in the chat and returns the
//! [`VoteEvent`]s it produced. Only collaborator failures come back as `Err`.

use std::sync::Arc;

use court_store::RecordStore;
use court_types::{InboundMessage, Roster, Timestamp, UserId, VoteId, VoteKind};
use court_utils::{Clock, SystemClock};

use crate::events::{FailReason, Refusal, VoteEvent};
use crate::nomination::detect_nomination;
use crate::notifier::Notifier;
use crate::vote::Vote;
use crate::{wording, VoteError};

/// How a ballot ended the vote, if it did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Resolution {
    Pass,
    Fail(FailReason),
}

/// Evaluate a vote after a ballot: pass first, then fail, then the
/// tie-break on a complete set of ballots.
fn resolution_after(vote: &Vote, last_ballot_agrees: bool, now: Timestamp) -> Option<Resolution> {
    if vote.should_pass() {
        Some(Resolution::Pass)
    } else if vote.should_fail(now) {
        if vote.is_expired(now) {
            Some(Resolution::Fail(FailReason::Expired))
        } else {
            Some(Resolution::Fail(FailReason::Rejected))
        }
    } else if vote.is_complete() {
        if last_ballot_agrees {
            Some(Resolution::Pass)
        } else {
            Some(Resolution::Fail(FailReason::TieBreak))
        }
    } else {
        None
    }
}

/// Holds at most one active [`Vote`].
pub struct VoteManager {
    active: Option<Vote>,
    next_id: u64,
    notifier: Arc<dyn Notifier>,
    store: Arc<dyn RecordStore>,
    roster: Roster,
    clock: Arc<dyn Clock>,
}

impl VoteManager {
    pub fn new(notifier: Arc<dyn Notifier>, store: Arc<dyn RecordStore>, roster: Roster) -> Self {
        Self {
            active: None,
            next_id: 1,
            notifier,
            store,
            roster,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The vote currently open, expired or not.
    pub fn active(&self) -> Option<&Vote> {
        self.active.as_ref()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Open a vote of `kind` against `target`.
    pub async fn initiate(
        &mut self,
        msg: &InboundMessage,
        target: &str,
        kind: VoteKind,
        delete_command: bool,
    ) -> Result<Vec<VoteEvent>, VoteError> {
        let now = self.clock.now();
        let mut events = Vec::new();

        if let Some(expired) = self.take_expired(now) {
            events.push(self.announce_expiry(msg, &expired).await?);
        }

        if let Some(active) = &self.active {
            let id = active.id();
            tracing::debug!(vote_id = %id, "initiate refused, vote in progress");
            self.respond(msg, wording::VOTE_IN_PROGRESS, false).await?;
            events.push(VoteEvent::Refused(Refusal::VoteInProgress(id)));
            return Ok(events);
        }

        let Some(target_user) = self.roster.resolve(target) else {
            let target = target.trim();
            tracing::debug!(nominee = target, "initiate refused, target not on roster");
            self.respond(msg, &wording::user_not_found(target), false)
                .await?;
            events.push(VoteEvent::Refused(Refusal::UnknownTarget(target.to_string())));
            return Ok(events);
        };

        let id = VoteId(self.next_id);
        self.next_id += 1;

        let initiator = msg.sender.id;
        let mut vote = Vote::new(id, kind, target_user.clone(), initiator, msg.chat_id, now);
        vote.cast(initiator, true, now)?;
        self.active = Some(vote);

        tracing::info!(
            vote_id = %id,
            %kind,
            nominee = %target_user,
            initiator = %initiator,
            chat = %msg.chat_id,
            "vote started"
        );

        let name = self.roster.display_name(&target_user);
        self.respond(msg, &wording::started(kind, &name), delete_command)
            .await?;

        events.push(VoteEvent::Started {
            id,
            kind,
            target: target_user,
            initiator,
        });
        Ok(events)
    }

    /// Record the sender's ballot on the active vote and resolve it if the
    /// ballot decided it.
    pub async fn cast_ballot(
        &mut self,
        msg: &InboundMessage,
        agree: bool,
    ) -> Result<Vec<VoteEvent>, VoteError> {
        let now = self.clock.now();
        let mut events = Vec::new();

        if !self.ensure_live(msg, now, &mut events).await? {
            return Ok(events);
        }
        let Some(vote) = self.active.as_mut() else {
            return Ok(events);
        };

        let voter = msg.sender.id;
        let cast = vote.cast(voter, agree, now)?;
        let (agree_count, reject_count) = (vote.agree_count(), vote.reject_count());
        let name = self.roster.display_name(vote.target_user());
        let update = wording::tally_update(vote.kind(), &name, agree_count, reject_count);
        let resolution = resolution_after(vote, agree, now);
        let id = vote.id();

        tracing::debug!(
            vote_id = %id,
            voter = %voter,
            agree,
            ?cast,
            agree_count,
            reject_count,
            "ballot cast"
        );
        events.push(VoteEvent::BallotCast {
            id,
            voter,
            agree,
            agree_count,
            reject_count,
        });

        // The tally update is informational; resolution must still happen
        // if it cannot be delivered.
        if let Err(e) = self.respond(msg, &update, false).await {
            tracing::warn!(vote_id = %id, error = %e, "could not send tally update");
        }

        match resolution {
            Some(Resolution::Pass) => {
                if let Some(vote) = self.active.take() {
                    events.push(self.resolve_pass(vote).await?);
                }
            }
            Some(Resolution::Fail(reason)) => {
                if let Some(vote) = self.active.take() {
                    events.push(self.resolve_fail(vote, reason).await?);
                }
            }
            None => {}
        }
        Ok(events)
    }

    /// Report the active vote's tally and remaining time.
    pub async fn status(&mut self, msg: &InboundMessage) -> Result<Vec<VoteEvent>, VoteError> {
        let now = self.clock.now();
        let mut events = Vec::new();

        if !self.ensure_live(msg, now, &mut events).await? {
            return Ok(events);
        }
        let Some(vote) = self.active.as_ref() else {
            return Ok(events);
        };

        let id = vote.id();
        let name = self.roster.display_name(vote.target_user());
        let text = wording::status(
            vote.kind(),
            &name,
            vote.agree_count(),
            vote.reject_count(),
            vote.time_remaining(now),
        );
        self.respond(msg, &text, false).await?;
        events.push(VoteEvent::StatusReported { id });
        Ok(events)
    }

    /// Treat a reply containing a nomination phrase as `initiate` against the
    /// replied-to author. Any other message is ignored.
    pub async fn handle_reply_nomination(
        &mut self,
        msg: &InboundMessage,
    ) -> Result<Vec<VoteEvent>, VoteError> {
        let Some(replied) = msg.reply_to.as_ref() else {
            return Ok(Vec::new());
        };
        let Some(kind) = detect_nomination(&msg.text) else {
            return Ok(Vec::new());
        };
        let target: UserId = replied.handle();
        tracing::debug!(%kind, nominee = %target, "nomination by reply");
        self.initiate(msg, target.as_str(), kind, false).await
    }

    /// Remove the active vote if it has run out of time.
    fn take_expired(&mut self, now: Timestamp) -> Option<Vote> {
        if self.active.as_ref().is_some_and(|v| v.is_expired(now)) {
            self.active.take()
        } else {
            None
        }
    }

    /// Make sure there is a live vote to operate on, clearing an expired one.
    /// Returns `false` (after replying) when there is none.
    async fn ensure_live(
        &mut self,
        msg: &InboundMessage,
        now: Timestamp,
        events: &mut Vec<VoteEvent>,
    ) -> Result<bool, VoteError> {
        if let Some(expired) = self.take_expired(now) {
            events.push(self.announce_expiry(msg, &expired).await?);
            return Ok(false);
        }
        if self.active.is_none() {
            self.respond(msg, wording::NO_ACTIVE_VOTE, false).await?;
            events.push(VoteEvent::Refused(Refusal::NoActiveVote));
            return Ok(false);
        }
        Ok(true)
    }

    async fn announce_expiry(
        &self,
        msg: &InboundMessage,
        expired: &Vote,
    ) -> Result<VoteEvent, VoteError> {
        tracing::info!(
            vote_id = %expired.id(),
            kind = %expired.kind(),
            nominee = %expired.target_user(),
            agree = expired.agree_count(),
            reject = expired.reject_count(),
            "vote expired"
        );
        self.respond(msg, wording::VOTE_EXPIRED, false).await?;
        Ok(VoteEvent::Expired { id: expired.id() })
    }

    /// Write the penalty and announce it. The vote is already out of
    /// `active`, so a failed announcement cannot cause a second write.
    async fn resolve_pass(&self, vote: Vote) -> Result<VoteEvent, VoteError> {
        let target = vote.target_user();
        let name = self.roster.display_name(target);

        let prior = match self.store.get_user_record(target) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(nominee = %target, error = %e, "could not read prior record");
                None
            }
        };
        let record = self.store.save_user_record(target, vote.kind())?;

        tracing::info!(
            vote_id = %vote.id(),
            kind = %vote.kind(),
            nominee = %target,
            bailan = record.bailan_count,
            warning = record.warning_count,
            "vote passed"
        );

        let text = wording::passed(vote.kind(), &name, prior.as_ref());
        self.notifier.send(vote.chat_id(), &text).await?;

        Ok(VoteEvent::Passed {
            id: vote.id(),
            kind: vote.kind(),
            target: target.clone(),
            record,
        })
    }

    async fn resolve_fail(&self, vote: Vote, reason: FailReason) -> Result<VoteEvent, VoteError> {
        let target = vote.target_user();
        let name = self.roster.display_name(target);

        tracing::info!(
            vote_id = %vote.id(),
            kind = %vote.kind(),
            nominee = %target,
            reason = reason.as_str(),
            "vote failed"
        );

        let text = wording::failed(vote.kind(), &name, reason);
        self.notifier.send(vote.chat_id(), &text).await?;

        Ok(VoteEvent::Failed {
            id: vote.id(),
            kind: vote.kind(),
            target: target.clone(),
            reason,
        })
    }

    /// Reply in the message's chat, optionally deleting the message itself.
    /// Deletion failures are logged and ignored.
    async fn respond(
        &self,
        msg: &InboundMessage,
        text: &str,
        delete_command: bool,
    ) -> Result<(), VoteError> {
        self.notifier.send(msg.chat_id, text).await?;
        if delete_command {
            if let Err(e) = self.notifier.delete(msg.chat_id, msg.message_id).await {
                tracing::warn!(
                    chat = %msg.chat_id,
                    message = %msg.message_id,
                    error = %e,
                    "could not delete command message"
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use court_types::{ChatId, VoterId};

    fn make_vote(now: Timestamp) -> Vote {
        Vote::new(
            VoteId(1),
            VoteKind::Bailan,
            UserId::new("@maxbillchung"),
            VoterId(1),
            ChatId(-1),
            now,
        )
    }

    #[test]
    fn no_resolution_after_initiator_only() {
        let now = Timestamp::new(100);
        let mut vote = make_vote(now);
        vote.cast(VoterId(1), true, now).unwrap();
        assert_eq!(resolution_after(&vote, true, now), None);
    }

    #[test]
    fn second_agree_resolves_pass() {
        let now = Timestamp::new(100);
        let mut vote = make_vote(now);
        vote.cast(VoterId(1), true, now).unwrap();
        vote.cast(VoterId(2), true, now).unwrap();
        assert_eq!(resolution_after(&vote, true, now), Some(Resolution::Pass));
    }

    #[test]
    fn second_reject_resolves_fail() {
        let now = Timestamp::new(100);
        let mut vote = make_vote(now);
        vote.cast(VoterId(1), true, now).unwrap();
        vote.cast(VoterId(2), false, now).unwrap();
        vote.cast(VoterId(3), false, now).unwrap();
        assert_eq!(
            resolution_after(&vote, false, now),
            Some(Resolution::Fail(FailReason::Rejected))
        );
    }

    #[test]
    fn expiry_is_reported_as_the_failure_reason() {
        let start = Timestamp::new(100);
        let mut vote = make_vote(start);
        vote.cast(VoterId(1), true, start).unwrap();
        let later = start.plus_secs(crate::VOTE_DURATION_SECS);
        assert_eq!(
            resolution_after(&vote, true, later),
            Some(Resolution::Fail(FailReason::Expired))
        );
    }
}
