use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::{info, warn};

use refid_api::{AllocatorApiAdapter, HttpApi};
use refid_core::{AllocContext, Allocator, FormatRegistry};
use refid_prometheus::PrometheusMetrics;
use refid_store::SqliteCounterStore;

use crate::config::ServiceConfig;

/// Open the store, build the allocator and apply configured seeds.
pub async fn build_allocator(
    config: &ServiceConfig,
    metrics: PrometheusMetrics,
) -> anyhow::Result<Arc<Allocator>> {
    let registry =
        FormatRegistry::from_specs(&config.report_types).context("invalid report types")?;
    let store = SqliteCounterStore::open(&config.store)
        .with_context(|| format!("opening counter store {}", config.store.path.display()))?;

    let ctx = AllocContext::default()
        .with_overflow(config.overflow)
        .with_metrics(Arc::new(metrics));
    let allocator =
        Arc::new(Allocator::new(Arc::new(registry), Arc::new(store)).with_context(ctx));

    for (report_type, last_issued) in &config.seed {
        allocator
            .seed_from_existing(report_type, [last_issued])
            .await
            .with_context(|| format!("seeding '{report_type}' from {last_issued}"))?;
    }

    info!(
        report_types = allocator.registry().len(),
        overflow = %config.overflow,
        store = allocator.store_name(),
        "allocator ready"
    );
    Ok(allocator)
}

/// API routes plus `GET /metrics`.
pub fn router(allocator: Arc<Allocator>, metrics: PrometheusMetrics) -> Router {
    let api = HttpApi::new(Arc::new(AllocatorApiAdapter::new(allocator))).router();
    let exposition = Router::new()
        .route("/metrics", get(serve_metrics))
        .with_state(Arc::new(metrics));
    api.merge(exposition)
}

async fn serve_metrics(State(metrics): State<Arc<PrometheusMetrics>>) -> Response {
    match metrics.render() {
        Ok(body) => ([(header::CONTENT_TYPE, metrics.content_type())], body).into_response(),
        Err(err) => {
            warn!(error = %err, "metrics encoding failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
