use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use refid_core::{CounterStore, MAX_SEQUENCE, StoreError, StoreResult};
use refid_model::{CounterRecord, ReportTypeKey, SequenceValue};
use rusqlite::{Connection, OpenFlags, OptionalExtension, TransactionBehavior, params};
use tracing::{debug, instrument, trace, warn};

use crate::config::SqliteStoreConfig;

const COUNTER_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS report_counters (
    report_type TEXT PRIMARY KEY NOT NULL,
    last_value INTEGER NOT NULL CHECK (last_value >= 0),
    updated_at INTEGER NOT NULL
);
"#;

const INCREMENT_SQL: &str = "
INSERT INTO report_counters (report_type, last_value, updated_at)
VALUES (?1, 1, CAST(strftime('%s', 'now') AS INTEGER))
ON CONFLICT(report_type) DO UPDATE
    SET last_value = last_value + 1,
        updated_at = excluded.updated_at
    WHERE last_value < ?2
RETURNING last_value";

const RAISE_SQL: &str = "
INSERT INTO report_counters (report_type, last_value, updated_at)
VALUES (?1, ?2, CAST(strftime('%s', 'now') AS INTEGER))
ON CONFLICT(report_type) DO UPDATE
    SET last_value = MAX(last_value, excluded.last_value),
        updated_at = excluded.updated_at
RETURNING last_value";

/// SQLite-backed [`CounterStore`].
///
/// Holds one connection behind a mutex; all database work runs on the
/// blocking thread pool. Other processes may open the same file: the
/// `BEGIN IMMEDIATE` write lock and the busy timeout keep their increments
/// serialised as well.
#[derive(Clone, Debug)]
pub struct SqliteCounterStore {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl SqliteCounterStore {
    /// Open (creating if needed) the database described by `config`.
    pub fn open(config: &SqliteStoreConfig) -> StoreResult<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Unavailable(format!(
                        "cannot create directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
        let conn = Connection::open_with_flags(&config.path, flags).map_err(unavailable)?;
        // Before the pragmas: switching journal mode needs the write lock too.
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))
            .map_err(unavailable)?;
        conn.execute_batch(&format!(
            "PRAGMA journal_mode = {}; PRAGMA synchronous = {};",
            config.journal_mode.pragma_value(),
            config.sync_mode.pragma_value()
        ))
        .map_err(unavailable)?;
        conn.execute_batch(COUNTER_SCHEMA).map_err(unavailable)?;

        debug!(path = %config.path.display(), journal = %config.journal_mode, sync = %config.sync_mode, "sqlite counter store opened");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: config.path.clone(),
        })
    }

    /// Private in-memory database; not durable.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(unavailable)?;
        conn.execute_batch(COUNTER_SCHEMA).map_err(unavailable)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: PathBuf::from(":memory:"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, op: &'static str, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> StoreResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let result = tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| StoreError::Unavailable("sqlite connection lock poisoned".into()))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("{op} did not complete: {e}")))?;

        if let Err(err) = &result {
            warn!(op, error = %err, "sqlite counter operation failed");
        }
        result
    }
}

#[async_trait]
impl CounterStore for SqliteCounterStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    #[instrument(level = "trace", skip(self, report_type), fields(report_type = %report_type))]
    async fn increment(
        &self,
        report_type: &ReportTypeKey,
        ceiling: SequenceValue,
    ) -> StoreResult<SequenceValue> {
        let key = report_type.to_string();
        if ceiling == 0 {
            return Err(StoreError::Exhausted {
                report_type: key,
                ceiling,
            });
        }
        let bound = to_db_value(ceiling.min(MAX_SEQUENCE))?;

        self.with_conn("increment", move |conn| {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(unavailable)?;
            let next: Option<i64> = tx
                .query_row(INCREMENT_SQL, params![key, bound], |row| row.get(0))
                .optional()
                .map_err(unavailable)?;

            let Some(next) = next else {
                // Upsert filtered out: counter already at the ceiling. Nothing written.
                return Err(StoreError::Exhausted {
                    report_type: key,
                    ceiling,
                });
            };
            let next = from_db_value(&key, next)?;
            tx.commit().map_err(unavailable)?;

            trace!(report_type = %key, value = next, "sqlite counter incremented");
            Ok(next)
        })
        .await
    }

    async fn current_value(&self, report_type: &ReportTypeKey) -> StoreResult<SequenceValue> {
        let key = report_type.to_string();
        self.with_conn("current_value", move |conn| {
            let value: Option<i64> = conn
                .query_row(
                    "SELECT last_value FROM report_counters WHERE report_type = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()
                .map_err(unavailable)?;
            value.map_or(Ok(0), |v| from_db_value(&key, v))
        })
        .await
    }

    async fn raise_to(
        &self,
        report_type: &ReportTypeKey,
        floor: SequenceValue,
    ) -> StoreResult<SequenceValue> {
        let key = report_type.to_string();
        if floor > MAX_SEQUENCE {
            return Err(StoreError::Exhausted {
                report_type: key,
                ceiling: MAX_SEQUENCE,
            });
        }
        let floor = to_db_value(floor)?;

        self.with_conn("raise_to", move |conn| {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(unavailable)?;
            let value: i64 = tx
                .query_row(RAISE_SQL, params![key, floor], |row| row.get(0))
                .map_err(unavailable)?;
            let value = from_db_value(&key, value)?;
            tx.commit().map_err(unavailable)?;
            Ok(value)
        })
        .await
    }

    async fn records(&self) -> StoreResult<Vec<CounterRecord>> {
        self.with_conn("records", |conn| {
            let mut stmt = conn
                .prepare("SELECT report_type, last_value FROM report_counters ORDER BY report_type")
                .map_err(unavailable)?;
            let mut rows = stmt.query([]).map_err(unavailable)?;

            let mut records = Vec::new();
            while let Some(row) = rows.next().map_err(unavailable)? {
                let key: String = row.get(0).map_err(unavailable)?;
                let value: i64 = row.get(1).map_err(unavailable)?;
                let last_value = from_db_value(&key, value)?;
                let report_type = ReportTypeKey::new(key)
                    .map_err(|e| StoreError::Corrupt(e.to_string()))?;
                records.push(CounterRecord::new(report_type, last_value));
            }
            Ok(records)
        })
        .await
    }
}

fn unavailable(err: rusqlite::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

fn to_db_value(value: SequenceValue) -> StoreResult<i64> {
    i64::try_from(value)
        .map_err(|_| StoreError::Corrupt(format!("sequence value {value} exceeds sqlite range")))
}

fn from_db_value(report_type: &str, value: i64) -> StoreResult<SequenceValue> {
    SequenceValue::try_from(value).map_err(|_| {
        StoreError::Corrupt(format!("negative counter {value} for report type {report_type}"))
    })
}
