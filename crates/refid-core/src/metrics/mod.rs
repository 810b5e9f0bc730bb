//! Metrics collection abstraction for the allocator.
//!
//! Backends (prometheus, statsd, etc) implement [`AllocationMetrics`] and are injected via [`crate::AllocContext`].
mod backend;
pub use backend::{AllocOutcome, AllocationMetrics, MetricsHandle, UNKNOWN_REPORT_TYPE_LABEL};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
