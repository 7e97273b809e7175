//! End-to-end tests of the HTTP API over in-memory backends.

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use around::ingestion::IngestionOrchestrator;
use around::query::{QueryConfig, QueryOrchestrator};
use around::server::{create_app, AppState};
use around_repository::{
    ColumnStoreError, RadiusQuery, SearchHit, SearchIndexError, SearchIndexProvider,
};
use around_shared::{Post, PostId, SearchDocument};

use common::{test_app, test_app_with, RecordingColumns};

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Option<String>, String) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

fn post_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/post")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn search_request(query: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/search?{query}"))
        .body(Body::empty())
        .unwrap()
}

fn post_body(user: &str, message: &str, lat: f64, lon: f64) -> Value {
    json!({ "user": user, "message": message, "location": { "lat": lat, "lon": lon } })
}

#[tokio::test]
async fn test_health() {
    let app = test_app();

    let response = app
        .router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_ingested_post_is_found_by_radius_search() {
    let app = test_app();

    let (status, content_type, body) =
        send(&app.router, post_request(post_body("alice", "hello", 47.6, -122.3))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/plain"));
    assert_eq!(body, "Post is saved to Index: hello\n");

    let (status, content_type, body) =
        send(&app.router, search_request("lat=47.6&lon=-122.3&range=10")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("application/json"));

    let posts: Vec<Post> = serde_json::from_str(&body).unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].user, "alice");
    assert_eq!(posts[0].message, "hello");
    assert_eq!(posts[0].location.lat, 47.6);
    assert_eq!(posts[0].location.lon, -122.3);

    // The search document and the wide-column row share one identity.
    let documents = app.index.documents.lock().unwrap();
    let rows = app.columns.rows.lock().unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, "post");
    assert_eq!(rows[0].1, documents[0].0);
}

#[tokio::test]
async fn test_search_results_carry_no_ids() {
    let app = test_app();
    send(&app.router, post_request(post_body("alice", "hello", 47.6, -122.3))).await;

    let (_, _, body) = send(&app.router, search_request("lat=47.6&lon=-122.3")).await;

    let value: Value = serde_json::from_str(&body).unwrap();
    let first = value.as_array().unwrap()[0].as_object().unwrap();
    let mut keys: Vec<_> = first.keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["location", "message", "user"]);
}

#[tokio::test]
async fn test_omitted_range_uses_default_radius() {
    let app = test_app();
    // About 135 km east of the search center.
    send(&app.router, post_request(post_body("bob", "far", 47.6, -120.5))).await;

    let (_, _, body) = send(&app.router, search_request("lat=47.6&lon=-122.3&range=10")).await;
    assert_eq!(body, "[]");

    let (_, _, body) = send(&app.router, search_request("lat=47.6&lon=-122.3")).await;
    let posts: Vec<Post> = serde_json::from_str(&body).unwrap();
    assert_eq!(posts.len(), 1);

    let queries = app.index.queries.lock().unwrap();
    assert_eq!(queries.last().unwrap().radius_km, 200.0);
}

#[tokio::test]
async fn test_configured_default_radius() {
    let app = test_app_with(QueryConfig {
        default_radius_km: 50.0,
        ..QueryConfig::default()
    });

    send(&app.router, search_request("lat=1&lon=2")).await;

    assert_eq!(app.index.queries.lock().unwrap()[0].radius_km, 50.0);
}

#[tokio::test]
async fn test_no_matches_is_empty_array() {
    let app = test_app();

    let (status, _, body) = send(&app.router, search_request("lat=0&lon=0&range=1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[tokio::test]
async fn test_latitude_survives_column_encoding() {
    let app = test_app();

    send(&app.router, post_request(post_body("carol", "precise", 47.123456789, 8.5))).await;

    let rows = app.columns.rows.lock().unwrap();
    let record = &rows[0].2;
    let lat = std::str::from_utf8(record.get("location", "lat").unwrap()).unwrap();
    let lon = std::str::from_utf8(record.get("location", "lon").unwrap()).unwrap();
    assert_eq!(lat.parse::<f64>().unwrap(), 47.123456789);
    assert_eq!(lon.parse::<f64>().unwrap(), 8.5);
    assert_eq!(record.get("post", "user").unwrap(), b"carol");
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let app = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/post")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"user\": \"alice\""))
        .unwrap();

    let (status, _, body) = send(&app.router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["code"], "decode_error");
    assert!(app.index.documents.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_post_body_is_json_whatever_the_content_type() {
    let app = test_app();
    let body = post_body("alice", "hello", 47.6, -122.3).to_string();

    for content_type in [Some("application/x-www-form-urlencoded"), Some("text/plain"), None] {
        let mut builder = Request::builder().method("POST").uri("/post");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body.clone())).unwrap();

        let (status, _, text) = send(&app.router, request).await;

        assert_eq!(status, StatusCode::OK, "content type {content_type:?}");
        assert_eq!(text, "Post is saved to Index: hello\n");
    }
    assert_eq!(app.index.documents.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_missing_field_is_decode_error() {
    let app = test_app();

    let (status, _, body) =
        send(&app.router, post_request(json!({ "user": "alice", "message": "hi" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["code"], "decode_error");
}

#[tokio::test]
async fn test_out_of_range_location_is_invalid_post() {
    let app = test_app();

    let (status, _, body) =
        send(&app.router, post_request(post_body("alice", "hi", 95.0, 0.0))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["code"], "invalid_post");
    assert!(app.index.documents.lock().unwrap().is_empty());
    assert!(app.columns.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_index_outage_skips_column_write() {
    let app = test_app();
    app.index
        .fail_with(SearchIndexError::unavailable("connection refused"));

    let (status, _, body) =
        send(&app.router, post_request(post_body("alice", "hello", 47.6, -122.3))).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["code"], "index_write_failed");
    assert!(app.columns.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_index_rejection_is_bad_gateway() {
    let app = test_app();
    app.index
        .fail_with(SearchIndexError::backend(400, "mapper_parsing_exception"));

    let (status, _, _) =
        send(&app.router, post_request(post_body("alice", "hello", 47.6, -122.3))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_column_failure_reports_dangling_document() {
    let app = test_app();
    app.columns
        .fail_with(ColumnStoreError::backend(404, "table not found"));

    let (status, _, body) =
        send(&app.router, post_request(post_body("alice", "hello", 47.6, -122.3))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["code"], "column_write_failed");

    // The index write is not rolled back.
    let documents = app.index.documents.lock().unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(
        PostId::from(body["id"].as_str().unwrap().to_string()),
        documents[0].0
    );
}

#[tokio::test]
async fn test_missing_coordinates_are_rejected() {
    let app = test_app();

    let (status, _, body) = send(&app.router, search_request("lon=-122.3")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["code"], "invalid_coordinates");
    assert!(app.index.queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_lenient_coordinates_default_to_origin() {
    let app = test_app_with(QueryConfig {
        lenient_coordinates: true,
        ..QueryConfig::default()
    });

    let (status, _, _) = send(&app.router, search_request("lat=abc")).await;

    assert_eq!(status, StatusCode::OK);
    let queries = app.index.queries.lock().unwrap();
    assert_eq!(queries[0].center.lat, 0.0);
    assert_eq!(queries[0].center.lon, 0.0);
}

#[tokio::test]
async fn test_non_positive_range_is_rejected() {
    let app = test_app();

    let (status, _, body) = send(&app.router, search_request("lat=1&lon=2&range=-1")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["code"], "invalid_range");
}

#[tokio::test]
async fn test_search_outage_is_service_unavailable() {
    let app = test_app();
    app.index.fail_with(SearchIndexError::unavailable("timeout"));

    let (status, _, body) = send(&app.router, search_request("lat=1&lon=2")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["code"], "search_failed");
}

/// Index whose searches never finish in time.
struct SlowIndex;

#[async_trait]
impl SearchIndexProvider for SlowIndex {
    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
        Ok(())
    }

    async fn put_document(
        &self,
        _id: &PostId,
        _document: &SearchDocument,
        _refresh: bool,
    ) -> Result<(), SearchIndexError> {
        Ok(())
    }

    async fn search_by_radius(
        &self,
        _query: &RadiusQuery,
    ) -> Result<Vec<SearchHit>, SearchIndexError> {
        tokio::time::sleep(Duration::from_secs(2)).await;
        Ok(vec![])
    }
}

#[tokio::test(start_paused = true)]
async fn test_request_deadline_returns_json_error() {
    let index = Arc::new(SlowIndex);
    let ingestion =
        IngestionOrchestrator::new(index.clone(), Arc::new(RecordingColumns::default()), "post");
    let query = QueryOrchestrator::new(index, QueryConfig::default());
    let router = create_app(
        AppState::new(ingestion, query),
        Duration::from_millis(100),
    );

    let (status, content_type, body) = send(&router, search_request("lat=1&lon=2")).await;

    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert!(content_type.unwrap().starts_with("application/json"));
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["code"], "request_timeout");
}
