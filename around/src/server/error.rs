//! Mapping of request failures onto HTTP responses.
//!
//! Every error body has the shape `{"status":"error","code":..,"message":..}`.
//! Backend failures answer 503 when the backend was unreachable and 502 when
//! it refused the request.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

use around_repository::BackendFailure;

use crate::errors::{IngestError, QueryError};

#[derive(Debug)]
pub enum ApiError {
    /// The request body or query string could not be decoded.
    Decode(String),
    Ingest(IngestError),
    Query(QueryError),
    /// The request did not finish within the configured deadline.
    Timeout(Duration),
}

impl ApiError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Decode(_) => StatusCode::BAD_REQUEST,
            Self::Ingest(IngestError::InvalidPost(_)) => StatusCode::BAD_REQUEST,
            Self::Ingest(e) => backend_status(e.failure()),
            Self::Query(QueryError::SearchFailed(e)) => backend_status(Some(e.failure())),
            Self::Query(_) => StatusCode::BAD_REQUEST,
            Self::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode_error",
            Self::Ingest(IngestError::InvalidPost(_)) => "invalid_post",
            Self::Ingest(IngestError::IndexWriteFailed(_)) => "index_write_failed",
            Self::Ingest(IngestError::ColumnWriteFailed { .. }) => "column_write_failed",
            Self::Query(QueryError::InvalidCoordinates(_)) => "invalid_coordinates",
            Self::Query(QueryError::InvalidRange(_)) => "invalid_range",
            Self::Query(QueryError::SearchFailed(_)) => "search_failed",
            Self::Timeout(_) => "request_timeout",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Decode(msg) => msg.clone(),
            Self::Ingest(e) => e.to_string(),
            Self::Query(e) => e.to_string(),
            Self::Timeout(deadline) => format!(
                "Request did not complete within {} ms",
                deadline.as_millis()
            ),
        }
    }
}

fn backend_status(failure: Option<BackendFailure>) -> StatusCode {
    match failure {
        Some(BackendFailure::Rejected) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        Self::Ingest(err)
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        Self::Query(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = self.message();
        warn!(status = status.as_u16(), code = code, message = %message, "Request failed");

        let mut body = json!({
            "status": "error",
            "code": code,
            "message": message,
        });
        if let Self::Ingest(IngestError::ColumnWriteFailed { id, .. }) = &self {
            body["id"] = json!(id);
        }

        (status, Json(body)).into_response()
    }
}
