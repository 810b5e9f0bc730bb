use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use refid_model::{AllocatedIdentifier, CounterRecord, ReportTypeSpec, SequenceValue};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, handler::ApiHandler};

/// HTTP API service builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
}

impl<H> HttpApi<H>
where
    H: ApiHandler,
{
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Build the axum router.
    ///
    /// Routes:
    /// - POST /api/v1/identifiers/{report_type} - Allocate next identifier
    /// - GET /api/v1/identifiers/{report_type}/latest - Last issued identifier
    /// - POST /api/v1/identifiers/{report_type}/seed - Raise counter from legacy identifiers
    /// - GET /api/v1/report-types - Registered formats
    /// - GET /api/v1/counters - Counter snapshot
    pub fn router(self) -> Router {
        Router::new()
            .route("/api/v1/identifiers/{report_type}", post(allocate::<H>))
            .route("/api/v1/identifiers/{report_type}/latest", get(latest::<H>))
            .route("/api/v1/identifiers/{report_type}/seed", post(seed::<H>))
            .route("/api/v1/report-types", get(report_types::<H>))
            .route("/api/v1/counters", get(counters::<H>))
            .with_state(self.handler)
    }
}

// Request/Response types

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LatestResponse {
    report_type: String,
    latest: Option<AllocatedIdentifier>,
}

#[derive(Debug, Deserialize)]
struct SeedRequest {
    identifiers: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedResponse {
    report_type: String,
    counter: SequenceValue,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportTypesResponse {
    report_types: Vec<ReportTypeSpec>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CountersResponse {
    counters: Vec<CounterRecord>,
}

// Handlers

/// POST /api/v1/identifiers/{report_type}
async fn allocate<H>(
    State(handler): State<Arc<H>>,
    Path(report_type): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let identifier = handler.allocate(&report_type).await?;
    Ok((StatusCode::CREATED, Json(identifier)))
}

/// GET /api/v1/identifiers/{report_type}/latest
async fn latest<H>(
    State(handler): State<Arc<H>>,
    Path(report_type): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let latest = handler.latest(&report_type).await?;
    Ok(Json(LatestResponse {
        report_type,
        latest,
    }))
}

/// POST /api/v1/identifiers/{report_type}/seed
async fn seed<H>(
    State(handler): State<Arc<H>>,
    Path(report_type): Path<String>,
    Json(req): Json<SeedRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    if req.identifiers.is_empty() {
        return Err(ApiError::InvalidRequest("identifiers cannot be empty".into()));
    }

    let counter = handler.seed(&report_type, req.identifiers).await?;
    Ok(Json(SeedResponse {
        report_type,
        counter,
    }))
}

/// GET /api/v1/report-types
async fn report_types<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let report_types = handler.report_types().await?;
    Ok(Json(ReportTypesResponse { report_types }))
}

/// GET /api/v1/counters
async fn counters<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let counters = handler.counters().await?;
    Ok(Json(CountersResponse { counters }))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{body::to_bytes, response::Response};
    use refid_core::{Allocator, CounterStore, FormatRegistry, MemoryCounterStore};
    use serde_json::Value;

    use crate::AllocatorApiAdapter;

    fn fixture() -> (Arc<AllocatorApiAdapter>, Arc<MemoryCounterStore>) {
        let store = Arc::new(MemoryCounterStore::new());
        let allocator = Allocator::new(Arc::new(FormatRegistry::builtin()), store.clone());
        (Arc::new(AllocatorApiAdapter::new(Arc::new(allocator))), store)
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn post_allocate(handler: &Arc<AllocatorApiAdapter>, report_type: &str) -> Response {
        allocate(State(handler.clone()), Path(report_type.to_string()))
            .await
            .into_response()
    }

    #[test]
    fn router_builds() {
        let (handler, _) = fixture();
        let _ = HttpApi::new(handler).router();
    }

    #[tokio::test]
    async fn allocate_returns_created_identifier() {
        let (handler, _) = fixture();

        let response = post_allocate(&handler, "ill-health").await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = json_body(response).await;
        assert_eq!(body["identifier"], "IH-00001");
        assert_eq!(body["reportType"], "ill-health");
        assert_eq!(body["sequence"], 1);
    }

    #[tokio::test]
    async fn unknown_report_type_is_not_found() {
        let (handler, store) = fixture();

        let response = post_allocate(&handler, "near-miss").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = json_body(response).await;
        assert_eq!(body["kind"], "unknown_report_type");
        assert_eq!(body["retryable"], false);
        assert!(store.records().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreachable_store_is_service_unavailable() {
        let (handler, store) = fixture();
        store.set_reachable(false);

        let response = post_allocate(&handler, "fatality").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = json_body(response).await;
        assert_eq!(body["kind"], "store_unavailable");
        assert_eq!(body["retryable"], true);
        // No identifier of any shape is returned on failure.
        assert!(body.get("identifier").is_none());
    }

    #[tokio::test]
    async fn latest_reflects_allocations() {
        let (handler, _) = fixture();

        let response = latest(State(handler.clone()), Path("fatality".into()))
            .await
            .into_response();
        assert_eq!(json_body(response).await["latest"], Value::Null);

        post_allocate(&handler, "fatality").await;
        post_allocate(&handler, "fatality").await;

        let response = latest(State(handler.clone()), Path("fatality".into()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["latest"]["identifier"], "FT-00002");
    }

    #[tokio::test]
    async fn seed_raises_counter() {
        let (handler, _) = fixture();

        let req = SeedRequest {
            identifiers: vec!["UA-00007".into(), "UA-00041".into()],
        };
        let response = seed(State(handler.clone()), Path("unsafe-actions".into()), Json(req))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["counter"], 41);

        let response = post_allocate(&handler, "unsafe-actions").await;
        assert_eq!(json_body(response).await["identifier"], "UA-00042");
    }

    #[tokio::test]
    async fn seed_rejects_empty_and_foreign_identifiers() {
        let (handler, _) = fixture();

        let empty = SeedRequest { identifiers: vec![] };
        let response = seed(State(handler.clone()), Path("fatality".into()), Json(empty))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let foreign = SeedRequest {
            identifiers: vec!["IH-00003".into()],
        };
        let response = seed(State(handler.clone()), Path("fatality".into()), Json(foreign))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["kind"], "malformed_identifier");
    }

    #[tokio::test]
    async fn lists_report_types_and_counters() {
        let (handler, _) = fixture();
        post_allocate(&handler, "hospital-treatment").await;

        let response = report_types(State(handler.clone())).await.into_response();
        let body = json_body(response).await;
        let types = body["reportTypes"].as_array().unwrap();
        assert_eq!(types.len(), 4);
        assert!(
            types
                .iter()
                .any(|t| t["key"] == "hospital-treatment" && t["prefix"] == "HT" && t["padWidth"] == 5)
        );

        let response = counters(State(handler.clone())).await.into_response();
        let body = json_body(response).await;
        assert_eq!(body["counters"][0]["reportType"], "hospital-treatment");
        assert_eq!(body["counters"][0]["lastValue"], 1);
    }
}
