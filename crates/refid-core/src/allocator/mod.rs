//! Allocator: turns a report type into its next human-readable identifier.
//!
//! Steps per request:
//! 1. resolve the [`IdentifierFormat`] from the registry (fail fast, store untouched);
//! 2. atomically advance the report type's counter in the [`CounterStore`];
//! 3. render `<prefix>-<zero-padded value>`.
//!
//! Errors are propagated unchanged; no placeholder identifier is ever produced here.
mod context;
pub use context::AllocContext;

use std::{sync::Arc, time::Instant};

use refid_model::{
    AllocatedIdentifier, CounterRecord, IdentifierFormat, OverflowPolicy, SequenceValue,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::AllocationError,
    metrics::{AllocOutcome, UNKNOWN_REPORT_TYPE_LABEL},
    registry::FormatRegistry,
    store::{CounterStore, MAX_SEQUENCE, StoreError},
};

/// Sequential identifier allocator shared by all report-submission flows.
pub struct Allocator {
    registry: Arc<FormatRegistry>,
    store: Arc<dyn CounterStore>,
    ctx: AllocContext,
}

impl Allocator {
    /// Create an allocator with a default context (widen on overflow, no metrics).
    pub fn new(registry: Arc<FormatRegistry>, store: Arc<dyn CounterStore>) -> Self {
        Self {
            registry,
            store,
            ctx: AllocContext::default(),
        }
    }

    /// Set a custom context (overflow policy, metrics backend).
    #[inline]
    pub fn with_context(mut self, ctx: AllocContext) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    pub fn context(&self) -> &AllocContext {
        &self.ctx
    }

    /// Name of the underlying counter store.
    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// Allocate the next identifier for `report_type`.
    ///
    /// Must be awaited before the identifier is used to persist a record.
    /// If the caller abandons the request after the store committed, that
    /// sequence value becomes a permanent gap; it is never handed out again.
    #[instrument(level = "debug", skip(self), fields(store = self.store.name()))]
    pub async fn allocate(&self, report_type: &str) -> Result<AllocatedIdentifier, AllocationError> {
        let (key, format) = match self.registry.format_for(report_type) {
            Ok(found) => found,
            Err(err) => {
                warn!(error = %err, "allocation rejected");
                self.ctx.metrics().record_allocation(
                    UNKNOWN_REPORT_TYPE_LABEL,
                    AllocOutcome::from(&err),
                    0,
                );
                return Err(err);
            }
        };

        let ceiling = self.ceiling_for(format);
        let started = Instant::now();
        let result = self.store.increment(key, ceiling).await;
        let store_ms = elapsed_ms(started);

        match result {
            Ok(seq) => {
                let identifier = AllocatedIdentifier::new(key.clone(), seq, format.render(seq));
                self.ctx.metrics().record_allocation(
                    key.as_str(),
                    AllocOutcome::Allocated,
                    store_ms,
                );
                debug!(identifier = %identifier, sequence = seq, store_ms, "identifier allocated");
                Ok(identifier)
            }
            Err(store_err) => {
                let err = AllocationError::from_store(store_err, key, format);
                self.ctx.metrics().record_allocation(
                    key.as_str(),
                    AllocOutcome::from(&err),
                    store_ms,
                );
                warn!(error = %err, kind = err.kind(), "allocation failed");
                Err(err)
            }
        }
    }

    /// Last identifier issued for `report_type`, if any. Does not advance the counter.
    #[instrument(level = "debug", skip(self))]
    pub async fn latest(
        &self,
        report_type: &str,
    ) -> Result<Option<AllocatedIdentifier>, AllocationError> {
        let (key, format) = self.registry.format_for(report_type)?;
        let current = self
            .store
            .current_value(key)
            .await
            .map_err(|e| AllocationError::from_store(e, key, format))?;

        Ok((current > 0)
            .then(|| AllocatedIdentifier::new(key.clone(), current, format.render(current))))
    }

    /// Raise the counter of `report_type` past identifiers issued before the
    /// atomic counter existed (the legacy "read max, add one" records).
    ///
    /// Every identifier must be in the report type's format. Returns the
    /// counter value afterwards; a counter that is already higher is kept.
    #[instrument(level = "debug", skip(self, identifiers))]
    pub async fn seed_from_existing<I, S>(
        &self,
        report_type: &str,
        identifiers: I,
    ) -> Result<SequenceValue, AllocationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (key, format) = self.registry.format_for(report_type)?;

        let mut highest: SequenceValue = 0;
        let mut seen = 0usize;
        for id in identifiers {
            let seq = format
                .parse_sequence(id.as_ref())
                .map_err(|e| AllocationError::MalformedIdentifier(e.to_string()))?;
            highest = highest.max(seq);
            seen += 1;
        }

        let value = self
            .store
            .raise_to(key, highest)
            .await
            .map_err(|e| AllocationError::from_store(e, key, format))?;

        self.ctx.metrics().record_seed(key.as_str(), value);
        info!(report_type = %key, scanned = seen, highest, counter = value, "counter seeded from existing identifiers");
        Ok(value)
    }

    /// Snapshot of all counters known to the store.
    pub async fn counters(&self) -> Result<Vec<CounterRecord>, AllocationError> {
        self.store
            .records()
            .await
            .map_err(|e| match e {
                StoreError::Corrupt(reason) => AllocationError::CorruptCounter(reason),
                other => AllocationError::StoreUnavailable(other.to_string()),
            })
    }

    fn ceiling_for(&self, format: &IdentifierFormat) -> SequenceValue {
        match self.ctx.overflow() {
            OverflowPolicy::Widen => MAX_SEQUENCE,
            OverflowPolicy::Reject => format.max_padded_value().min(MAX_SEQUENCE),
        }
    }
}

impl std::fmt::Debug for Allocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Allocator")
            .field("report_types", &self.registry.len())
            .field("store", &self.store.name())
            .field("ctx", &self.ctx)
            .finish()
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
