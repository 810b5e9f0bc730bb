//! Caller-side handle for an allocation in flight.
//!
//! Report forms render [`AllocationView::Pending`] (the fixed placeholder text)
//! while the request runs and re-render once it resolves. The allocator itself
//! never substitutes a value: a failure stays a failure.
use std::sync::Arc;

use refid_model::{AllocatedIdentifier, AllocationView};
use tokio::{sync::watch, task::JoinHandle};
use tracing::trace;

use crate::{allocator::Allocator, error::AllocationError};

/// Map an allocation result to what a form may display.
pub fn allocation_view(result: &Result<AllocatedIdentifier, AllocationError>) -> AllocationView {
    match result {
        Ok(identifier) => AllocationView::Allocated {
            identifier: identifier.clone(),
        },
        Err(err) => AllocationView::Failed {
            retryable: err.is_retryable(),
            reason: err.to_string(),
        },
    }
}

/// Allocation running in the background.
///
/// Dropping the handle does not stop the request: if the store already
/// committed, that sequence value is a gap and is never reissued.
pub struct PendingAllocation {
    report_type: String,
    view: watch::Receiver<AllocationView>,
    task: JoinHandle<Result<AllocatedIdentifier, AllocationError>>,
}

impl PendingAllocation {
    /// Start allocating on the current tokio runtime.
    pub fn spawn(allocator: Arc<Allocator>, report_type: impl Into<String>) -> Self {
        let report_type = report_type.into();
        let (tx, rx) = watch::channel(AllocationView::Pending);

        let requested = report_type.clone();
        let task = tokio::spawn(async move {
            let result = allocator.allocate(&requested).await;
            // Nobody watching any more is fine; the result still goes to `wait`.
            if tx.send(allocation_view(&result)).is_err() {
                trace!(report_type = %requested, "allocation resolved with no observers");
            }
            result
        });

        Self {
            report_type,
            view: rx,
            task,
        }
    }

    pub fn report_type(&self) -> &str {
        &self.report_type
    }

    /// Current state for rendering.
    pub fn view(&self) -> AllocationView {
        self.view.borrow().clone()
    }

    /// Wait for the next state transition and return the new state.
    ///
    /// Returns the current state immediately if the request already resolved.
    pub async fn changed(&mut self) -> AllocationView {
        if self.view.borrow().is_final() {
            return self.view();
        }
        // An error means the sender is gone; the last sent value is still readable.
        let _ = self.view.changed().await;
        self.view.borrow_and_update().clone()
    }

    /// Wait for the final result.
    pub async fn wait(self) -> Result<AllocatedIdentifier, AllocationError> {
        match self.task.await {
            Ok(result) => result,
            Err(join_err) => Err(AllocationError::Interrupted(join_err.to_string())),
        }
    }
}

impl std::fmt::Debug for PendingAllocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingAllocation")
            .field("report_type", &self.report_type)
            .field("view", &*self.view.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use refid_model::{CounterRecord, PENDING_PLACEHOLDER, ReportTypeKey, SequenceValue};
    use tokio::sync::Notify;

    use super::*;
    use crate::{
        registry::FormatRegistry,
        store::{CounterStore, MemoryCounterStore, StoreResult},
    };

    /// Store whose increments block until released.
    struct GatedStore {
        inner: MemoryCounterStore,
        gate: Notify,
    }

    #[async_trait]
    impl CounterStore for GatedStore {
        fn name(&self) -> &'static str {
            "gated"
        }

        async fn increment(
            &self,
            report_type: &ReportTypeKey,
            ceiling: SequenceValue,
        ) -> StoreResult<SequenceValue> {
            self.gate.notified().await;
            self.inner.increment(report_type, ceiling).await
        }

        async fn current_value(&self, report_type: &ReportTypeKey) -> StoreResult<SequenceValue> {
            self.inner.current_value(report_type).await
        }

        async fn raise_to(
            &self,
            report_type: &ReportTypeKey,
            floor: SequenceValue,
        ) -> StoreResult<SequenceValue> {
            self.inner.raise_to(report_type, floor).await
        }

        async fn records(&self) -> StoreResult<Vec<CounterRecord>> {
            self.inner.records().await
        }
    }

    fn allocator(store: Arc<dyn CounterStore>) -> Arc<Allocator> {
        Arc::new(Allocator::new(Arc::new(FormatRegistry::builtin()), store))
    }

    #[tokio::test]
    async fn shows_placeholder_until_resolved() {
        let store = Arc::new(GatedStore {
            inner: MemoryCounterStore::new(),
            gate: Notify::new(),
        });
        let mut pending = PendingAllocation::spawn(allocator(store.clone()), "fatality");

        tokio::time::sleep(Duration::from_millis(20)).await;
        let view = pending.view();
        assert_eq!(view, AllocationView::Pending);
        assert_eq!(view.display_text(), PENDING_PLACEHOLDER);

        store.gate.notify_one();
        let view = pending.changed().await;
        assert_eq!(view.display_text(), "FT-00001");

        let id = pending.wait().await.unwrap();
        assert_eq!(id.as_str(), "FT-00001");
    }

    #[tokio::test]
    async fn failure_resolves_to_failed_view_not_an_identifier() {
        let store = Arc::new(MemoryCounterStore::new());
        store.set_reachable(false);
        let mut pending = PendingAllocation::spawn(allocator(store), "fatality");

        let view = pending.changed().await;
        match &view {
            AllocationView::Failed { retryable, .. } => assert!(*retryable),
            other => panic!("expected Failed view, got {other:?}"),
        }
        assert_eq!(view.display_text(), "");
        assert!(matches!(
            pending.wait().await,
            Err(AllocationError::StoreUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn unknown_type_is_not_retryable() {
        let mut pending =
            PendingAllocation::spawn(allocator(Arc::new(MemoryCounterStore::new())), "nope");
        assert_eq!(pending.report_type(), "nope");

        let view = pending.changed().await;
        assert!(matches!(view, AllocationView::Failed { retryable: false, .. }));
    }

    #[tokio::test]
    async fn dropped_handle_leaves_a_gap_not_a_reuse() {
        let store = Arc::new(MemoryCounterStore::new());
        let alloc = allocator(store.clone());

        let abandoned = PendingAllocation::spawn(Arc::clone(&alloc), "ill-health");
        drop(abandoned);

        // Let the detached task finish its increment.
        for _ in 0..100 {
            if store
                .current_value(&ReportTypeKey::new("ill-health").unwrap())
                .await
                .unwrap()
                == 1
            {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let next = alloc.allocate("ill-health").await.unwrap();
        assert_eq!(next.as_str(), "IH-00002");
    }
}
