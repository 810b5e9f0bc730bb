use std::{
    collections::BTreeMap,
    sync::{
        Mutex, MutexGuard,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use refid_model::{CounterRecord, ReportTypeKey, SequenceValue};
use tracing::trace;

use crate::store::{CounterStore, MAX_SEQUENCE, StoreError, StoreResult};

/// Process-local counter store.
///
/// Counters live in a mutex-guarded map, so the store is atomic across tasks
/// of one process but not durable across restarts. Used by tests and by
/// single-process deployments that seed counters at startup.
///
/// [`MemoryCounterStore::set_reachable`] simulates an outage: while
/// unreachable, every operation fails with [`StoreError::Unavailable`] and no
/// counter is touched.
#[derive(Debug)]
pub struct MemoryCounterStore {
    counters: Mutex<BTreeMap<ReportTypeKey, SequenceValue>>,
    reachable: AtomicBool,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(BTreeMap::new()),
            reachable: AtomicBool::new(true),
        }
    }

    /// Store pre-populated with the given counters.
    pub fn with_records(records: impl IntoIterator<Item = CounterRecord>) -> Self {
        let counters = records
            .into_iter()
            .map(|r| (r.report_type, r.last_value))
            .collect();
        Self {
            counters: Mutex::new(counters),
            reachable: AtomicBool::new(true),
        }
    }

    /// Toggle the simulated outage.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, BTreeMap<ReportTypeKey, SequenceValue>>> {
        if !self.reachable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store marked unreachable".into()));
        }
        self.counters
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

impl Default for MemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn increment(
        &self,
        report_type: &ReportTypeKey,
        ceiling: SequenceValue,
    ) -> StoreResult<SequenceValue> {
        let mut counters = self.lock()?;
        let current = counters.get(report_type).copied().unwrap_or(0);
        if current >= ceiling.min(MAX_SEQUENCE) {
            return Err(StoreError::Exhausted {
                report_type: report_type.to_string(),
                ceiling,
            });
        }

        let next = current + 1;
        counters.insert(report_type.clone(), next);
        trace!(report_type = %report_type, value = next, "memory counter incremented");
        Ok(next)
    }

    async fn current_value(&self, report_type: &ReportTypeKey) -> StoreResult<SequenceValue> {
        let counters = self.lock()?;
        Ok(counters.get(report_type).copied().unwrap_or(0))
    }

    async fn raise_to(
        &self,
        report_type: &ReportTypeKey,
        floor: SequenceValue,
    ) -> StoreResult<SequenceValue> {
        if floor > MAX_SEQUENCE {
            return Err(StoreError::Exhausted {
                report_type: report_type.to_string(),
                ceiling: MAX_SEQUENCE,
            });
        }
        let mut counters = self.lock()?;
        let value = counters.entry(report_type.clone()).or_insert(0);
        *value = (*value).max(floor);
        Ok(*value)
    }

    async fn records(&self) -> StoreResult<Vec<CounterRecord>> {
        let counters = self.lock()?;
        Ok(counters
            .iter()
            .map(|(k, v)| CounterRecord::new(k.clone(), *v))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Arc};

    use super::*;

    fn key(k: &str) -> ReportTypeKey {
        ReportTypeKey::new(k).unwrap()
    }

    #[tokio::test]
    async fn first_increment_returns_one() {
        let store = MemoryCounterStore::new();
        assert_eq!(store.current_value(&key("ill-health")).await.unwrap(), 0);
        assert_eq!(store.next_value(&key("ill-health")).await.unwrap(), 1);
        assert_eq!(store.next_value(&key("ill-health")).await.unwrap(), 2);
        assert_eq!(store.current_value(&key("ill-health")).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn counters_are_independent_per_report_type() {
        let store = MemoryCounterStore::new();
        store.next_value(&key("fatality")).await.unwrap();
        store.next_value(&key("fatality")).await.unwrap();

        assert_eq!(store.next_value(&key("ill-health")).await.unwrap(), 1);
        assert_eq!(store.current_value(&key("fatality")).await.unwrap(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_increments_return_each_value_once() {
        let store = Arc::new(MemoryCounterStore::new());
        let k = key("fatality");

        let mut handles = Vec::new();
        for _ in 0..500 {
            let store = Arc::clone(&store);
            let k = k.clone();
            handles.push(tokio::spawn(async move { store.next_value(&k).await }));
        }

        let mut seen = HashSet::new();
        for h in handles {
            assert!(seen.insert(h.await.unwrap().unwrap()));
        }
        assert_eq!(seen, (1..=500).collect::<HashSet<_>>());
    }

    #[tokio::test]
    async fn ceiling_stops_increment_without_advancing() {
        let store = MemoryCounterStore::with_records([CounterRecord::new(key("fatality"), 9)]);

        let err = store.increment(&key("fatality"), 9).await.unwrap_err();
        assert!(matches!(err, StoreError::Exhausted { ceiling: 9, .. }));
        assert_eq!(store.current_value(&key("fatality")).await.unwrap(), 9);
    }

    #[tokio::test]
    async fn unreachable_store_fails_and_keeps_counter() {
        let store = MemoryCounterStore::new();
        store.next_value(&key("fatality")).await.unwrap();

        store.set_reachable(false);
        let err = store.next_value(&key("fatality")).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(store.raise_to(&key("fatality"), 10).await.is_err());

        store.set_reachable(true);
        assert_eq!(store.current_value(&key("fatality")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn raise_to_never_lowers() {
        let store = MemoryCounterStore::new();
        assert_eq!(store.raise_to(&key("fatality"), 12).await.unwrap(), 12);
        assert_eq!(store.raise_to(&key("fatality"), 3).await.unwrap(), 12);
        assert_eq!(store.next_value(&key("fatality")).await.unwrap(), 13);
    }

    #[tokio::test]
    async fn raise_past_max_sequence_is_rejected() {
        let store = MemoryCounterStore::new();
        let err = store
            .raise_to(&key("fatality"), MAX_SEQUENCE + 1)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Exhausted { .. }));
    }

    #[tokio::test]
    async fn records_are_sorted_by_key() {
        let store = MemoryCounterStore::new();
        store.next_value(&key("unsafe-actions")).await.unwrap();
        store.next_value(&key("fatality")).await.unwrap();

        let records = store.records().await.unwrap();
        let keys: Vec<_> = records.iter().map(|r| r.report_type.as_str()).collect();
        assert_eq!(keys, ["fatality", "unsafe-actions"]);
    }
}
