use std::{fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::SqliteConfigError;

const DEFAULT_PATH: &str = "data/refid.db";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// SQLite journal mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqliteJournalMode {
    /// Write-ahead log (default): readers never block the writer.
    #[default]
    Wal,
    /// Rollback journal.
    Delete,
}

impl SqliteJournalMode {
    pub(crate) fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "WAL",
            Self::Delete => "DELETE",
        }
    }
}

impl FromStr for SqliteJournalMode {
    type Err = SqliteConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wal" => Ok(Self::Wal),
            "delete" => Ok(Self::Delete),
            _ => Err(SqliteConfigError::UnknownJournalMode(s.to_string())),
        }
    }
}

impl fmt::Display for SqliteJournalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pragma_value().to_ascii_lowercase())
    }
}

/// SQLite `synchronous` setting.
///
/// `Full` fsyncs on every commit, so an issued sequence value survives power
/// loss. `Normal` in WAL mode may lose the last commits on power loss (not on
/// process crash), which could reissue a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqliteSyncMode {
    #[default]
    Full,
    Normal,
}

impl SqliteSyncMode {
    pub(crate) fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "FULL",
            Self::Normal => "NORMAL",
        }
    }
}

impl FromStr for SqliteSyncMode {
    type Err = SqliteConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "normal" => Ok(Self::Normal),
            _ => Err(SqliteConfigError::UnknownSyncMode(s.to_string())),
        }
    }
}

impl fmt::Display for SqliteSyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pragma_value().to_ascii_lowercase())
    }
}

/// Configuration for [`crate::SqliteCounterStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SqliteStoreConfig {
    /// Database file; parent directories are created on open.
    pub path: PathBuf,
    /// How long a writer waits for the database lock before giving up.
    pub busy_timeout_ms: u64,
    pub journal_mode: SqliteJournalMode,
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

impl Default for SqliteStoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_PATH),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteJournalMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}
