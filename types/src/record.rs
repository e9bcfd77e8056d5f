//! Cumulative penalty counters per roster member.

use crate::{Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// The persisted tally for one user.
///
/// `warning_count` is 0 or 1: a second warning is converted into a bailan by
/// the record store when it is written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: UserId,
    pub bailan_count: u32,
    pub warning_count: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserRecord {
    /// A zeroed record, as created on a user's first penalty.
    pub fn new(user_id: UserId, now: Timestamp) -> Self {
        Self {
            user_id,
            bailan_count: 0,
            warning_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether an unconverted warning is pending.
    pub fn has_pending_warning(&self) -> bool {
        self.warning_count > 0
    }

    /// Short tally shown in `/records`, e.g. `3` or `3 + 醜一`.
    pub fn summary(&self) -> String {
        if self.has_pending_warning() {
            format!("{} + 醜一", self.bailan_count)
        } else {
            self.bailan_count.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_marks_pending_warning() {
        let mut record = UserRecord::new(UserId::new("@a"), Timestamp::new(1));
        record.bailan_count = 3;
        assert_eq!(record.summary(), "3");
        record.warning_count = 1;
        assert_eq!(record.summary(), "3 + 醜一");
    }
}
