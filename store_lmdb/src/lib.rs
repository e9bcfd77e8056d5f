//! LMDB storage backend for the court bot.
//!
//! Implements the storage traits from `court-store` using the `heed` LMDB bindings.
//! Each logical store maps to one LMDB database within a single environment.

pub mod environment;
pub mod error;
pub mod record;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use record::LmdbRecordStore;
