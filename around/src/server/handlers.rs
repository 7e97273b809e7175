//! HTTP request handlers.

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

use around_shared::Post;

use crate::query::SearchParams;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "around is running")
}

/// Ingest one post and acknowledge it in plain text.
///
/// The body is decoded as JSON whatever its declared content type, so plain
/// `curl -d` clients work.
pub async fn post_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<String, ApiError> {
    let post: Post = serde_json::from_slice(&body)
        .map_err(|e| ApiError::decode(format!("Failed to decode post: {}", e)))?;
    info!(user = %post.user, "Received one post request");

    let receipt = state.ingestion.ingest(post).await?;

    Ok(format!("Post is saved to Index: {}\n", receipt.message))
}

/// Return every post within the requested radius as a JSON array.
pub async fn search_handler(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::decode(e.body_text()))?;
    info!(
        lat = ?params.lat,
        lon = ?params.lon,
        range = ?params.range,
        "Received one search request"
    );

    let posts = state.query.search(&params).await?;

    Ok(Json(posts))
}
