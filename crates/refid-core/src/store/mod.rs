//! Counter store abstraction: one durable, atomically incremented counter per report type.
//!
//! The store is the only reader and writer of counter state. Allocation logic
//! depends on the contract below, not on any particular query shape:
//! - `increment` is atomic per report type: N concurrent calls starting from `k`
//!   return exactly `k+1..=k+N`, each value to one caller;
//! - the first increment of an unknown report type returns `1`;
//! - a value is returned only after the new counter is persisted;
//! - failures are reported, never replaced by a default value.
mod error;
pub use error::{StoreError, StoreResult};

mod memory;
pub use memory::MemoryCounterStore;

use async_trait::async_trait;
use refid_model::{CounterRecord, ReportTypeKey, SequenceValue};

/// Largest sequence value any store has to represent.
///
/// Matches the signed 64-bit integer columns typical of relational stores.
pub const MAX_SEQUENCE: SequenceValue = i64::MAX as SequenceValue;

/// Durable per-report-type counter with atomic fetch-and-increment.
#[async_trait]
pub trait CounterStore: Send + Sync + 'static {
    /// Store name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Atomically advance the counter by one and return the new value.
    ///
    /// Fails with [`StoreError::Exhausted`] (counter untouched) when the
    /// current value is already `>= ceiling`.
    async fn increment(
        &self,
        report_type: &ReportTypeKey,
        ceiling: SequenceValue,
    ) -> StoreResult<SequenceValue>;

    /// Atomically advance the counter with no ceiling below [`MAX_SEQUENCE`].
    async fn next_value(&self, report_type: &ReportTypeKey) -> StoreResult<SequenceValue> {
        self.increment(report_type, MAX_SEQUENCE).await
    }

    /// Last assigned value, `0` when nothing was issued yet. Read-only.
    async fn current_value(&self, report_type: &ReportTypeKey) -> StoreResult<SequenceValue>;

    /// Atomically set the counter to `max(current, floor)` and return the result.
    ///
    /// Never lowers a counter. Fails with [`StoreError::Exhausted`] when
    /// `floor > MAX_SEQUENCE`.
    async fn raise_to(
        &self,
        report_type: &ReportTypeKey,
        floor: SequenceValue,
    ) -> StoreResult<SequenceValue>;

    /// Snapshot of all counters, ordered by report type.
    async fn records(&self) -> StoreResult<Vec<CounterRecord>>;
}
