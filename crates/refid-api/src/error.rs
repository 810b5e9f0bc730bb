use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use refid_core::AllocationError;
use serde::Serialize;
use thiserror::Error;

/// Seconds a client should wait before retrying a retryable failure.
const RETRY_AFTER_SECS: &str = "1";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Allocation(#[from] AllocationError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
    retryable: bool,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Allocation(err) => match err {
                AllocationError::UnknownReportType(_) => StatusCode::NOT_FOUND,
                AllocationError::StoreUnavailable(_) | AllocationError::Interrupted(_) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                AllocationError::CounterOverflow { .. } => StatusCode::CONFLICT,
                AllocationError::MalformedIdentifier(_) => StatusCode::BAD_REQUEST,
                AllocationError::CorruptCounter(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "invalid_request",
            ApiError::Allocation(err) => err.kind(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Allocation(err) if err.is_retryable())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(kind = self.kind(), error = %self, "request failed");
        }

        let retryable = self.is_retryable();
        let body = ErrorBody {
            error: self.to_string(),
            kind: self.kind(),
            retryable,
        };

        let mut response = (status, Json(body)).into_response();
        if retryable {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from_static(RETRY_AFTER_SECS));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (AllocationError::UnknownReportType("near-miss".into()), StatusCode::NOT_FOUND),
            (AllocationError::StoreUnavailable("down".into()), StatusCode::SERVICE_UNAVAILABLE),
            (
                AllocationError::CounterOverflow {
                    report_type: "fatality".into(),
                    ceiling: 99_999,
                    pad_width: 5,
                },
                StatusCode::CONFLICT,
            ),
            (AllocationError::MalformedIdentifier("XX-1".into()), StatusCode::BAD_REQUEST),
            (
                AllocationError::CorruptCounter("negative counter".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
        assert_eq!(
            ApiError::InvalidRequest("empty".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn only_store_failures_get_retry_after() {
        let unavailable = ApiError::from(AllocationError::StoreUnavailable("down".into()));
        let response = unavailable.into_response();
        assert_eq!(
            response.headers().get(header::RETRY_AFTER),
            Some(&HeaderValue::from_static("1"))
        );

        let unknown = ApiError::from(AllocationError::UnknownReportType("x".into()));
        assert!(unknown.into_response().headers().get(header::RETRY_AFTER).is_none());

        let corrupt = ApiError::from(AllocationError::CorruptCounter("negative counter".into()));
        let response = corrupt.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
    }
}
