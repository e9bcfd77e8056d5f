//! Nullable store: thread-safe in-memory record storage for testing.

use court_store::{apply_penalty, sort_by_recency, RecordStore, StoreError};
use court_types::{Timestamp, UserId, UserRecord, VoteKind};
use court_utils::{Clock, SystemClock};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// An in-memory [`RecordStore`] that counts its writes.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullRecordStore {
    records: Mutex<HashMap<UserId, UserRecord>>,
    writes: Mutex<Vec<(UserId, VoteKind)>>,
    clock: Arc<dyn Clock>,
    fail_reads: bool,
}

impl NullRecordStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            writes: Mutex::new(Vec::new()),
            clock: Arc::new(SystemClock),
            fail_reads: false,
        }
    }

    /// Stamp records with the given clock instead of wall time.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Make every read return a backend error. Writes still succeed.
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Seed a record directly, bypassing the penalty rules.
    pub fn insert(&self, record: UserRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(record.user_id.clone(), record);
    }

    /// Every `save_user_record` call so far, in order.
    pub fn writes(&self) -> Vec<(UserId, VoteKind)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    fn read_guard(&self) -> Result<(), StoreError> {
        if self.fail_reads {
            Err(StoreError::Backend("null store read failure".into()))
        } else {
            Ok(())
        }
    }

    fn now(&self) -> Timestamp {
        self.clock.now()
    }
}

impl Default for NullRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for NullRecordStore {
    fn get_user_record(&self, user: &UserId) -> Result<Option<UserRecord>, StoreError> {
        self.read_guard()?;
        Ok(self.records.lock().unwrap().get(user).cloned())
    }

    fn save_user_record(&self, user: &UserId, kind: VoteKind) -> Result<UserRecord, StoreError> {
        let now = self.now();
        let mut records = self.records.lock().unwrap();
        let updated = apply_penalty(records.get(user).cloned(), user, kind, now);
        records.insert(user.clone(), updated.clone());
        self.writes.lock().unwrap().push((user.clone(), kind));
        Ok(updated)
    }

    fn all_user_records(&self) -> Result<Vec<UserRecord>, StoreError> {
        self.read_guard()?;
        let mut all: Vec<_> = self.records.lock().unwrap().values().cloned().collect();
        sort_by_recency(&mut all);
        Ok(all)
    }
}
