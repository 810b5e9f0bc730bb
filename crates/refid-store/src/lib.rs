//! SQLite-backed durable counter store.
//!
//! One row per report type holds the last assigned sequence value. Every
//! increment runs as a single `BEGIN IMMEDIATE` upsert, so concurrent writers
//! (tasks of this process or other processes sharing the file) serialise on the
//! database write lock and each committed value is handed to exactly one caller.
mod config;
pub use config::{SqliteJournalMode, SqliteStoreConfig, SqliteSyncMode};

mod error;
pub use error::SqliteConfigError;

mod store;
pub use store::SqliteCounterStore;
