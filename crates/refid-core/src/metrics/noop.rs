use crate::metrics::backend::{AllocOutcome, AllocationMetrics};

/// No-op metrics backend that compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl AllocationMetrics for NoOpMetrics {
    #[inline(always)]
    fn record_allocation(&self, _: &str, _: AllocOutcome, _: u64) {}

    #[inline(always)]
    fn record_seed(&self, _: &str, _: u64) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_metrics_is_zero_size() {
        assert_eq!(std::mem::size_of::<NoOpMetrics>(), 0);
    }

    #[test]
    fn outcome_labels_are_stable() {
        let labels: Vec<_> = [
            AllocOutcome::Allocated,
            AllocOutcome::UnknownReportType,
            AllocOutcome::StoreUnavailable,
            AllocOutcome::CounterOverflow,
            AllocOutcome::Failed,
        ]
        .iter()
        .map(AllocOutcome::as_label)
        .collect();

        assert_eq!(
            labels,
            [
                "allocated",
                "unknown_report_type",
                "store_unavailable",
                "counter_overflow",
                "failed"
            ]
        );
    }
}
