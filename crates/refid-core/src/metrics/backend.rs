use std::sync::Arc;

use crate::error::AllocationError;

/// Label used instead of the requested key when the report type is unknown.
///
/// Keeps label cardinality bounded no matter what callers send.
pub const UNKNOWN_REPORT_TYPE_LABEL: &str = "unknown";

/// Allocation outcome for metrics classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocOutcome {
    /// Identifier issued.
    Allocated,
    /// Report type not registered.
    UnknownReportType,
    /// Store unreachable or increment not committed.
    StoreUnavailable,
    /// Pad width exhausted under the reject policy.
    CounterOverflow,
    /// Any other failure.
    Failed,
}

impl AllocOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            AllocOutcome::Allocated => "allocated",
            AllocOutcome::UnknownReportType => "unknown_report_type",
            AllocOutcome::StoreUnavailable => "store_unavailable",
            AllocOutcome::CounterOverflow => "counter_overflow",
            AllocOutcome::Failed => "failed",
        }
    }
}

impl From<&AllocationError> for AllocOutcome {
    fn from(err: &AllocationError) -> Self {
        match err {
            AllocationError::UnknownReportType(_) => AllocOutcome::UnknownReportType,
            AllocationError::StoreUnavailable(_) => AllocOutcome::StoreUnavailable,
            AllocationError::CounterOverflow { .. } => AllocOutcome::CounterOverflow,
            _ => AllocOutcome::Failed,
        }
    }
}

/// Backend metrics collection interface.
///
/// Implementations are injected via [`crate::AllocContext`] and shared by all allocations.
pub trait AllocationMetrics: Send + Sync + 'static {
    /// Record the end of an allocation request.
    ///
    /// # Arguments
    /// - `report_type`: registered key, or [`UNKNOWN_REPORT_TYPE_LABEL`]
    /// - `outcome`: how the request ended
    /// - `store_ms`: time spent in the counter store (0 if it was not contacted)
    fn record_allocation(&self, report_type: &str, outcome: AllocOutcome, store_ms: u64);

    /// Record a counter raised from legacy identifiers.
    fn record_seed(&self, report_type: &str, value: u64);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn AllocationMetrics>;
