use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqliteConfigError {
    #[error("unknown journal mode: {0} (expected: wal|delete)")]
    UnknownJournalMode(String),

    #[error("unknown sync mode: {0} (expected: full|normal)")]
    UnknownSyncMode(String),
}
