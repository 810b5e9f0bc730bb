use async_trait::async_trait;
use refid_model::{AllocatedIdentifier, CounterRecord, ReportTypeSpec, SequenceValue};

use crate::error::ApiError;

/// Identifier allocation API handler.
///
/// Implement it directly to put auth or rate limiting in front of the
/// allocator; otherwise use [`crate::AllocatorApiAdapter`].
#[async_trait]
pub trait ApiHandler: Send + Sync + 'static {
    /// Issue the next identifier for a report type.
    async fn allocate(&self, report_type: &str) -> Result<AllocatedIdentifier, ApiError>;

    /// Last identifier issued for a report type.
    async fn latest(&self, report_type: &str) -> Result<Option<AllocatedIdentifier>, ApiError>;

    /// Raise a counter past identifiers issued before the counter existed.
    async fn seed(
        &self,
        report_type: &str,
        identifiers: Vec<String>,
    ) -> Result<SequenceValue, ApiError>;

    /// Registered report types and their formats.
    async fn report_types(&self) -> Result<Vec<ReportTypeSpec>, ApiError>;

    /// Current value of every stored counter.
    async fn counters(&self) -> Result<Vec<CounterRecord>, ApiError>;
}
