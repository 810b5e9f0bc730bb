use std::sync::Arc;

use async_trait::async_trait;
use refid_core::Allocator;
use refid_model::{AllocatedIdentifier, CounterRecord, ReportTypeSpec, SequenceValue};

use crate::error::ApiError;
use crate::handler::ApiHandler;

/// [`ApiHandler`] that delegates straight to an [`Allocator`].
pub struct AllocatorApiAdapter {
    allocator: Arc<Allocator>,
}

impl AllocatorApiAdapter {
    pub fn new(allocator: Arc<Allocator>) -> Self {
        Self { allocator }
    }
}

#[async_trait]
impl ApiHandler for AllocatorApiAdapter {
    async fn allocate(&self, report_type: &str) -> Result<AllocatedIdentifier, ApiError> {
        Ok(self.allocator.allocate(report_type).await?)
    }

    async fn latest(&self, report_type: &str) -> Result<Option<AllocatedIdentifier>, ApiError> {
        Ok(self.allocator.latest(report_type).await?)
    }

    async fn seed(
        &self,
        report_type: &str,
        identifiers: Vec<String>,
    ) -> Result<SequenceValue, ApiError> {
        Ok(self
            .allocator
            .seed_from_existing(report_type, identifiers)
            .await?)
    }

    async fn report_types(&self) -> Result<Vec<ReportTypeSpec>, ApiError> {
        Ok(self
            .allocator
            .registry()
            .iter()
            .map(|(key, format)| ReportTypeSpec::new(key.as_str(), format.prefix(), format.pad_width()))
            .collect())
    }

    async fn counters(&self) -> Result<Vec<CounterRecord>, ApiError> {
        Ok(self.allocator.counters().await?)
    }
}
