//! Everything the engine says in the chat.

use court_types::{UserRecord, VoteKind};
use court_utils::format_hours;

use crate::FailReason;

pub const NO_ACTIVE_VOTE: &str = "目前沒有進行中的投票";
pub const VOTE_EXPIRED: &str = "投票時間超過8小時，自動失效";
pub const VOTE_IN_PROGRESS: &str = "已有進行中的投票";

pub fn user_not_found(target: &str) -> String {
    format!("找不到用戶 {target}，請確認用戶名稱是否正確")
}

/// The question being voted on, e.g. `澄澄兒 484 白爛`.
pub fn topic(kind: VoteKind, name: &str) -> String {
    match kind {
        VoteKind::Pardon => format!("是否赦免{name}"),
        _ => format!("{name} 484 {}", kind.label()),
    }
}

pub fn started(kind: VoteKind, name: &str) -> String {
    format!("開始投票: {}？", topic(kind, name))
}

pub fn tally_update(kind: VoteKind, name: &str, agree: usize, reject: usize) -> String {
    format!(
        "投票更新: {}？ 同意 {agree} / 反對 {reject}",
        topic(kind, name)
    )
}

pub fn status(kind: VoteKind, name: &str, agree: usize, reject: usize, hours_left: f64) -> String {
    format!(
        "{}？ 同意 {agree} / 反對 {reject} \n剩餘時間: {} 小時",
        topic(kind, name),
        format_hours(hours_left)
    )
}

/// Announcement for a passed vote. `prior` is the target's record before
/// the penalty was written; a pending warning means this warning converts.
pub fn passed(kind: VoteKind, name: &str, prior: Option<&UserRecord>) -> String {
    let outcome = match kind {
        VoteKind::Bailan => format!("{name} 白爛 +1"),
        VoteKind::Warning if prior.is_some_and(UserRecord::has_pending_warning) => {
            format!("{name} 醜二，白爛 +1")
        }
        VoteKind::Warning => format!("{name} 醜一"),
        VoteKind::Pardon => format!("赦免 {name}，白爛 -1"),
    };
    format!("投票結束: {outcome}")
}

pub fn failed(kind: VoteKind, name: &str, reason: FailReason) -> String {
    let outcome = match kind {
        VoteKind::Pardon => format!("赦免{name}失敗"),
        _ => format!("{name}不算{}", kind.label()),
    };
    format!("投票結束：{outcome}（{}）", reason_text(reason))
}

fn reason_text(reason: FailReason) -> &'static str {
    match reason {
        FailReason::Rejected => "反對達 2 票",
        FailReason::Expired => "投票逾時",
        FailReason::TieBreak => "最後一票反對",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use court_types::{Timestamp, UserId};

    #[test]
    fn topics_by_kind() {
        assert_eq!(topic(VoteKind::Bailan, "澄澄兒"), "澄澄兒 484 白爛");
        assert_eq!(topic(VoteKind::Warning, "澄澄兒"), "澄澄兒 484 醜一");
        assert_eq!(topic(VoteKind::Pardon, "澄澄兒"), "是否赦免澄澄兒");
    }

    #[test]
    fn warning_pass_mentions_conversion_only_with_pending_warning() {
        let mut record = UserRecord::new(UserId::new("@a"), Timestamp::new(1));
        assert_eq!(passed(VoteKind::Warning, "A", None), "投票結束: A 醜一");
        assert_eq!(
            passed(VoteKind::Warning, "A", Some(&record)),
            "投票結束: A 醜一"
        );
        record.warning_count = 1;
        assert_eq!(
            passed(VoteKind::Warning, "A", Some(&record)),
            "投票結束: A 醜二，白爛 +1"
        );
    }

    #[test]
    fn pardon_wording() {
        assert_eq!(passed(VoteKind::Pardon, "A", None), "投票結束: 赦免 A，白爛 -1");
        assert_eq!(
            failed(VoteKind::Pardon, "A", FailReason::Rejected),
            "投票結束：赦免A失敗（反對達 2 票）"
        );
    }

    #[test]
    fn failure_carries_reason() {
        assert_eq!(
            failed(VoteKind::Bailan, "A", FailReason::Expired),
            "投票結束：A不算白爛（投票逾時）"
        );
        assert_eq!(
            failed(VoteKind::Warning, "A", FailReason::TieBreak),
            "投票結束：A不算醜一（最後一票反對）"
        );
    }

    #[test]
    fn status_shows_hours_with_one_decimal() {
        assert_eq!(
            status(VoteKind::Bailan, "A", 1, 0, 7.5),
            "A 484 白爛？ 同意 1 / 反對 0 \n剩餘時間: 7.5 小時"
        );
    }
}
