//! Per-user penalty record storage.

use crate::StoreError;
use court_types::{Timestamp, UserId, UserRecord, VoteKind};

/// Trait for storing cumulative penalty counters.
///
/// `save_user_record` is the only mutation entry point. Implementations must
/// apply [`apply_penalty`] to the stored record atomically, so the
/// warning-to-bailan conversion always happens inside the store.
pub trait RecordStore: Send + Sync {
    /// Get a user's record, `None` if they were never penalised.
    fn get_user_record(&self, user: &UserId) -> Result<Option<UserRecord>, StoreError>;

    /// Apply a passed vote of `kind` to the user's record, creating it if needed.
    fn save_user_record(&self, user: &UserId, kind: VoteKind) -> Result<UserRecord, StoreError>;

    /// All records, most recently updated first.
    fn all_user_records(&self) -> Result<Vec<UserRecord>, StoreError>;
}

/// Compute the record that results from applying `kind` to `existing`.
///
/// - `Bailan` adds one bailan.
/// - `Warning` adds one warning; when that makes two, both are converted into
///   one bailan and the warning count returns to zero.
/// - `Pardon` removes one bailan, never going below zero.
pub fn apply_penalty(
    existing: Option<UserRecord>,
    user: &UserId,
    kind: VoteKind,
    now: Timestamp,
) -> UserRecord {
    let mut record = existing.unwrap_or_else(|| UserRecord::new(user.clone(), now));
    match kind {
        VoteKind::Bailan => record.bailan_count = record.bailan_count.saturating_add(1),
        VoteKind::Warning => {
            let warnings = record.warning_count.saturating_add(1);
            if warnings >= 2 {
                record.warning_count = 0;
                record.bailan_count = record.bailan_count.saturating_add(1);
            } else {
                record.warning_count = warnings;
            }
        }
        VoteKind::Pardon => record.bailan_count = record.bailan_count.saturating_sub(1),
    }
    record.updated_at = now;
    record
}

/// Order records most recently updated first, ties broken by user id.
pub fn sort_by_recency(records: &mut [UserRecord]) {
    records.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
}
