use std::sync::Arc;

use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, IntGaugeVec, Opts, Registry, TextEncoder,
    proto::MetricFamily,
};

use refid_core::{AllocOutcome, AllocationMetrics};

const NAMESPACE: &str = "refid";

/// Prometheus metrics backend for the allocator.
///
/// ## Label cardinality
/// - `report_type`: registered keys plus `"unknown"`
/// - `error_kind`: `AllocOutcome` labels
#[derive(Clone)]
pub struct PrometheusMetrics {
    allocations: CounterVec,
    failures: CounterVec,
    store_latency: HistogramVec,
    seeded: IntGaugeVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Create a backend registering into `registry`.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let allocations = CounterVec::new(
            Opts::new("allocations_total", "Identifiers issued").namespace(NAMESPACE),
            &["report_type"],
        )?;
        registry.register(Box::new(allocations.clone()))?;

        let failures = CounterVec::new(
            Opts::new("allocation_failures_total", "Allocation requests that failed")
                .namespace(NAMESPACE),
            &["report_type", "error_kind"],
        )?;
        registry.register(Box::new(failures.clone()))?;

        let store_latency = HistogramVec::new(
            HistogramOpts::new(
                "store_latency_seconds",
                "Time spent in the counter store per allocation",
            )
            .namespace(NAMESPACE)
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0]),
            &["report_type"],
        )?;
        registry.register(Box::new(store_latency.clone()))?;

        let seeded = IntGaugeVec::new(
            Opts::new("seeded_value", "Counter value after the last legacy seed")
                .namespace(NAMESPACE),
            &["report_type"],
        )?;
        registry.register(Box::new(seeded.clone()))?;

        Ok(Self {
            allocations,
            failures,
            store_latency,
            seeded,
            registry,
        })
    }

    /// Create a backend with its own registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    /// Gather all metric families for exposition.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Render the text exposition format served at `/metrics`.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    /// Content type matching [`Self::render`].
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl AllocationMetrics for PrometheusMetrics {
    fn record_allocation(&self, report_type: &str, outcome: AllocOutcome, store_ms: u64) {
        match outcome {
            AllocOutcome::Allocated => self.allocations.with_label_values(&[report_type]).inc(),
            other => self
                .failures
                .with_label_values(&[report_type, other.as_label()])
                .inc(),
        }

        // Unknown report types never reach the store.
        if outcome != AllocOutcome::UnknownReportType {
            self.store_latency
                .with_label_values(&[report_type])
                .observe(store_ms as f64 / 1000.0);
        }
    }

    fn record_seed(&self, report_type: &str, value: u64) {
        let value = i64::try_from(value).unwrap_or(i64::MAX);
        self.seeded.with_label_values(&[report_type]).set(value);
    }
}
