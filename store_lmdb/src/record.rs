//! LMDB implementation of RecordStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use court_store::{apply_penalty, sort_by_recency, RecordStore, StoreError};
use court_types::{Timestamp, UserId, UserRecord, VoteKind};

use crate::LmdbError;

pub struct LmdbRecordStore {
    pub(crate) env: Arc<Env>,
    pub(crate) user_records_db: Database<Bytes, Bytes>,
}

fn decode(bytes: &[u8]) -> Result<UserRecord, LmdbError> {
    Ok(bincode::deserialize(bytes)?)
}

impl RecordStore for LmdbRecordStore {
    fn get_user_record(&self, user: &UserId) -> Result<Option<UserRecord>, StoreError> {
        let key = user.as_str().as_bytes();
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self.user_records_db.get(&rtxn, key).map_err(LmdbError::from)? {
            Some(bytes) => Ok(Some(decode(bytes)?)),
            None => Ok(None),
        }
    }

    fn save_user_record(&self, user: &UserId, kind: VoteKind) -> Result<UserRecord, StoreError> {
        let key = user.as_str().as_bytes();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        // Read and write inside one transaction so the conversion rule sees
        // the committed state.
        let existing = match self.user_records_db.get(&wtxn, key).map_err(LmdbError::from)? {
            Some(bytes) => Some(decode(bytes)?),
            None => None,
        };
        let record = apply_penalty(existing, user, kind, Timestamp::now());
        let val = bincode::serialize(&record).map_err(LmdbError::from)?;

        self.user_records_db
            .put(&mut wtxn, key, &val)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;

        tracing::debug!(
            user = %user,
            %kind,
            bailan = record.bailan_count,
            warning = record.warning_count,
            "user record saved"
        );
        Ok(record)
    }

    fn all_user_records(&self) -> Result<Vec<UserRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.user_records_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in iter {
            let (key, val) = entry.map_err(LmdbError::from)?;
            match decode(val) {
                Ok(record) => results.push(record),
                Err(e) => {
                    tracing::warn!(
                        key = %String::from_utf8_lossy(key),
                        error = %e,
                        "skipping undecodable user record"
                    );
                }
            }
        }
        sort_by_recency(&mut results);
        Ok(results)
    }
}
