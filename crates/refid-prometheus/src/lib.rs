//! Prometheus metrics for the identifier allocator.
//!
//! [`PrometheusMetrics`] implements [`refid_core::AllocationMetrics`]; inject it through
//! [`refid_core::AllocContext::with_metrics`].
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use refid_core::AllocContext;
//! use refid_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let ctx = AllocContext::default().with_metrics(Arc::new(metrics.clone()));
//!
//! let body = metrics.render()?;
//! assert!(body.is_empty() || body.contains("refid_"));
//! # let _ = ctx;
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `refid_allocations_total{report_type}` - Counter
//! - `refid_allocation_failures_total{report_type, error_kind}` - Counter
//! - `refid_store_latency_seconds{report_type}` - Histogram
//! - `refid_seeded_value{report_type}` - Gauge
//!
//! Serving `/metrics` is left to the binary (see `refid-agentd`).
mod backend;
pub use backend::PrometheusMetrics;
