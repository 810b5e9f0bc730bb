use std::fmt;

use refid_model::OverflowPolicy;

use crate::metrics::MetricsHandle;

/// Shared settings applied to every allocation.
#[derive(Clone)]
pub struct AllocContext {
    overflow: OverflowPolicy,
    metrics: MetricsHandle,
}

impl AllocContext {
    /// Create a new context with the given params.
    pub fn new(overflow: OverflowPolicy, metrics: MetricsHandle) -> Self {
        Self { overflow, metrics }
    }

    pub fn overflow(&self) -> OverflowPolicy {
        self.overflow
    }

    /// Get a clonable handle to the metrics backend.
    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }

    /// Replace the overflow policy and return updated context.
    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    /// Replace the metrics backend and return updated context.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }
}

impl Default for AllocContext {
    fn default() -> Self {
        Self {
            overflow: OverflowPolicy::default(),
            metrics: crate::metrics::noop_metrics(),
        }
    }
}

impl fmt::Debug for AllocContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllocContext")
            .field("overflow", &self.overflow)
            .field("metrics", &"<handle>")
            .finish()
    }
}

impl fmt::Display for AllocContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AllocContext(overflow={})", self.overflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_widens_with_noop_metrics() {
        let ctx = AllocContext::default();
        assert_eq!(ctx.overflow(), OverflowPolicy::Widen);
        ctx.metrics()
            .record_allocation("fatality", crate::AllocOutcome::Allocated, 1);
    }

    #[test]
    fn with_overflow_replaces_policy() {
        let ctx = AllocContext::default().with_overflow(OverflowPolicy::Reject);
        assert_eq!(ctx.overflow(), OverflowPolicy::Reject);
        assert_eq!(ctx.to_string(), "AllocContext(overflow=reject)");
    }
}
