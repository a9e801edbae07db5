//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use crew_cache::{
    api::create_router,
    cache::{CacheEntry, EntryStore, FileStore, MemoryStore, ResultCache},
    AppState,
};
use chrono::{TimeDelta, Utc};
use serde_json::Value;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    let cache = ResultCache::new(MemoryStore::new(), Duration::from_secs(300));
    create_router(AppState::new(cache))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn put_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// == Cache Endpoint Tests ==

#[tokio::test]
async fn test_store_then_lookup() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(put_json("/cache", r#"{"key":"abc","result":"hello"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert!(json["message"].as_str().unwrap().contains("abc"));

    let response = app.oneshot(get("/cache/abc")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"], "abc");
    assert_eq!(json["result"], "hello");
}

#[tokio::test]
async fn test_lookup_unknown_key_is_404() {
    let app = create_test_app();

    let response = app.oneshot(get("/cache/never-written")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("never-written"));
}

#[tokio::test]
async fn test_store_empty_key_is_400() {
    let app = create_test_app();

    let response = app
        .oneshot(put_json("/cache", r#"{"key":"","result":"x"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_overwrite_returns_latest() {
    let app = create_test_app();

    for result in ["one", "two"] {
        let body = format!(r#"{{"key":"abc","result":"{}"}}"#, result);
        let response = app.clone().oneshot(put_json("/cache", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.oneshot(get("/cache/abc")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["result"], "two");
}

#[tokio::test]
async fn test_delete_then_lookup() {
    let app = create_test_app();
    app.clone()
        .oneshot(put_json("/cache", r#"{"key":"abc","result":"hello"}"#))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/cache/abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/cache/abc")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_corrupt_record_is_500() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    fs::write(store.path_for("abc"), r#"{"result":"hello"}"#).unwrap();
    let app = create_router(AppState::new(ResultCache::new(
        store,
        Duration::from_secs(300),
    )));

    let response = app.oneshot(get("/cache/abc")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("Corrupt cache entry"));
}

#[tokio::test]
async fn test_purge_removes_expired_file_records() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    let stale = CacheEntry::new("stale", "old", Utc::now() - TimeDelta::days(2));
    store.write(&stale).unwrap();
    let stale_path = store.path_for("stale");
    let fresh_path = store.path_for("fresh");
    let app = create_router(AppState::new(ResultCache::new(
        store,
        Duration::from_secs(3600),
    )));
    app.clone()
        .oneshot(put_json("/cache", r#"{"key":"fresh","result":"new"}"#))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/purge")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["purged"], 1);
    assert!(!stale_path.exists());
    assert!(fresh_path.exists());

    let response = app.oneshot(get("/cache/fresh")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// == Hook Endpoint Tests ==

#[tokio::test]
async fn test_validate_inputs_normalizes_topic() {
    let app = create_test_app();

    let response = app
        .oneshot(post_json("/inputs/validate", r#"{"topic":"  Foo Bar  ","n":1}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["inputs"]["topic"], "foo bar");
    assert_eq!(json["inputs"]["n"], 1);
    assert!(json["inputs"]["timestamp"].is_string());
}

#[tokio::test]
async fn test_validate_inputs_missing_topic_is_400() {
    let app = create_test_app();

    let response = app
        .oneshot(post_json("/inputs/validate", r#"{"other":"x"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("topic"));
}

#[tokio::test]
async fn test_validate_inputs_null_passes_through() {
    let app = create_test_app();

    let response = app
        .oneshot(post_json("/inputs/validate", "null"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert!(json["inputs"].is_null());
}

#[tokio::test]
async fn test_task_completed_is_accepted() {
    let app = create_test_app();

    let response = app
        .oneshot(post_json(
            "/tasks/completed",
            r#"{"task":"research_task","output":"ten bullet points","agent":"researcher"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["output_chars"], 17);
}

// == Service Endpoint Tests ==

#[tokio::test]
async fn test_stats_reflect_lookups() {
    let app = create_test_app();
    app.clone()
        .oneshot(put_json("/cache", r#"{"key":"abc","result":"hello"}"#))
        .await
        .unwrap();
    app.clone().oneshot(get("/cache/abc")).await.unwrap();
    app.clone().oneshot(get("/cache/zzz")).await.unwrap();

    let response = app.oneshot(get("/stats")).await.unwrap();
    let json = body_to_json(response.into_body()).await;

    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["writes"], 1);
    assert_eq!(json["hit_rate"], 0.5);
    assert_eq!(json["ttl_secs"], 300);
}

#[tokio::test]
async fn test_video_templates() {
    let app = create_test_app();

    let response = app.oneshot(get("/video/templates")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["tutorial", "educational", "tech_review", "creative"]);
}

#[tokio::test]
async fn test_health() {
    let app = create_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
}
