//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::record::LmdbRecordStore;
use crate::LmdbError;

/// Name of the database holding one `UserRecord` per user.
const USER_RECORDS_DB: &str = "user_records";

/// Default map size: records are tiny, 64 MiB is plenty.
pub const DEFAULT_MAP_SIZE: usize = 64 * 1024 * 1024;

/// Default number of named databases.
pub const DEFAULT_MAX_DBS: u32 = 4;

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    user_records_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    ///
    /// The directory is created if it does not exist.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per process for this path and
        // never concurrently memory-mapped with incompatible options.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(max_dbs)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let user_records_db: Database<Bytes, Bytes> =
            env.create_database(&mut wtxn, Some(USER_RECORDS_DB))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), "LMDB environment opened");

        Ok(Self {
            env: Arc::new(env),
            user_records_db,
        })
    }

    /// Open with the default database count and map size.
    pub fn open_default(path: &Path) -> Result<Self, LmdbError> {
        Self::open(path, DEFAULT_MAX_DBS, DEFAULT_MAP_SIZE)
    }

    /// A record store backed by this environment.
    pub fn record_store(&self) -> LmdbRecordStore {
        LmdbRecordStore {
            env: Arc::clone(&self.env),
            user_records_db: self.user_records_db.clone(),
        }
    }
}
