use thiserror::Error;

use refid_model::{IdentifierFormat, ReportTypeKey, SequenceValue};

use crate::store::StoreError;

/// Failure of an allocation request.
///
/// Nothing in the allocation path converts one of these into a default
/// identifier: the caller decides what to show (see [`crate::PendingAllocation`]).
#[derive(Debug, Error)]
pub enum AllocationError {
    /// No format registered under this key. Configuration problem, not retryable.
    #[error("unknown report type: {0}")]
    UnknownReportType(String),

    /// Counter store unreachable or the increment did not commit. Retry with backoff.
    #[error("counter store unavailable: {0}")]
    StoreUnavailable(String),

    /// Sequence would exceed the pad width under the `reject` overflow policy.
    #[error(
        "counter overflow for '{report_type}': ceiling {ceiling} reached (pad width {pad_width})"
    )]
    CounterOverflow {
        report_type: String,
        ceiling: SequenceValue,
        pad_width: u8,
    },

    /// An identifier handed in for seeding does not match the report type's format.
    #[error("malformed identifier: {0}")]
    MalformedIdentifier(String),

    /// The allocation task ended before producing a result.
    #[error("allocation interrupted: {0}")]
    Interrupted(String),

    /// Persisted counter state is unreadable. Needs an operator, not a retry.
    #[error("counter state corrupt: {0}")]
    CorruptCounter(String),
}

impl AllocationError {
    /// Low-cardinality label for logs, metrics and API payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            AllocationError::UnknownReportType(_) => "unknown_report_type",
            AllocationError::StoreUnavailable(_) => "store_unavailable",
            AllocationError::CounterOverflow { .. } => "counter_overflow",
            AllocationError::MalformedIdentifier(_) => "malformed_identifier",
            AllocationError::Interrupted(_) => "interrupted",
            AllocationError::CorruptCounter(_) => "corrupt_counter",
        }
    }

    /// Whether the same request may succeed if retried later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AllocationError::StoreUnavailable(_) | AllocationError::Interrupted(_)
        )
    }

    /// Translate a store failure for the given report type.
    pub(crate) fn from_store(
        err: StoreError,
        report_type: &ReportTypeKey,
        format: &IdentifierFormat,
    ) -> Self {
        match err {
            StoreError::Exhausted { ceiling, .. } => AllocationError::CounterOverflow {
                report_type: report_type.to_string(),
                ceiling,
                pad_width: format.pad_width(),
            },
            StoreError::Corrupt(reason) => AllocationError::CorruptCounter(reason),
            other @ StoreError::Unavailable(_) => AllocationError::StoreUnavailable(other.to_string()),
        }
    }
}
