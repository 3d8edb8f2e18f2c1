//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use mirror_cache::{
    api::create_router,
    cache::{CacheEngine, ManualClock},
    store::{FileStore, MemoryStore, PersistentStore},
    AppState, KeyValueCache,
};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    create_router(AppState::from_store(Arc::new(MemoryStore::new())))
}

fn create_clocked_app() -> (Router, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let engine = CacheEngine::with_clock(Arc::new(MemoryStore::new()), clock.clone());
    let state = AppState::new(KeyValueCache::new(Arc::new(engine)));
    (create_router(state), clock)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

fn add_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/cache")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn delete_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// == ADD / READ ==

#[tokio::test]
async fn test_add_then_read_is_case_insensitive() {
    let app = create_test_app();

    let (status, json) = send(&app, add_request(r#"{"key":"  Greeting ","value":"hello"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "greeting");

    let (status, json) = send(&app, get_request("/api/cache?key=GREETING")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "greeting");
    assert_eq!(json["value"], "hello");
}

#[tokio::test]
async fn test_read_missing_returns_empty_value() {
    let app = create_test_app();

    let (status, json) = send(&app, get_request("/api/cache?key=nope")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], "");
}

#[tokio::test]
async fn test_read_without_key_is_bad_request() {
    let app = create_test_app();

    let (status, json) = send(&app, get_request("/api/cache")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("Key"));
}

#[tokio::test]
async fn test_add_blank_key_is_bad_request() {
    let app = create_test_app();

    let (status, _) = send(&app, add_request(r#"{"key":"   ","value":"x"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_lifetime_expires_entry() {
    let (app, clock) = create_clocked_app();

    send(
        &app,
        add_request(r#"{"key":"session","value":"abc","lifeTimeInSeconds":1}"#),
    )
    .await;

    let (_, json) = send(&app, get_request("/api/cache?key=session")).await;
    assert_eq!(json["value"], "abc");

    clock.advance_secs(2);

    let (status, json) = send(&app, get_request("/api/cache?key=session")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], "");
}

// == REMOVE ==

#[tokio::test]
async fn test_remove_is_idempotent() {
    let app = create_test_app();
    send(&app, add_request(r#"{"key":"gone","value":"soon"}"#)).await;

    for _ in 0..2 {
        let (status, json) = send(&app, delete_request("/api/cache?key=GONE")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["removed"], true);
    }

    let (_, json) = send(&app, get_request("/api/cache?key=gone")).await;
    assert_eq!(json["value"], "");
}

// == UPDATE ==

#[tokio::test]
async fn test_update_is_not_implemented() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/cache")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"key":"k","value":"v"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("not supported"));
}

// == VALUES / RELOAD ==

#[tokio::test]
async fn test_values_reflect_mirror_after_reload() {
    let app = create_test_app();
    send(&app, add_request(r#"{"key":"a","value":"alpha"}"#)).await;
    send(&app, add_request(r#"{"key":"b","value":"beta"}"#)).await;

    let (_, json) = send(&app, get_request("/api/cache/values")).await;
    assert_eq!(json["count"], 0, "Writes do not populate the mirror");

    let reload = Request::builder()
        .method("POST")
        .uri("/api/cache/reload")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(&app, reload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["entries"], 2);

    let (_, json) = send(&app, get_request("/api/cache/values")).await;
    assert_eq!(json["count"], 2);
    assert_eq!(json["values"][0], "alpha");
    assert_eq!(json["values"][1], "beta");
}

// == STATS / HEALTH ==

#[tokio::test]
async fn test_stats_track_read_sources() {
    let app = create_test_app();
    send(&app, add_request(r#"{"key":"s","value":"v"}"#)).await;

    send(&app, get_request("/api/cache?key=s")).await; // store
    send(&app, get_request("/api/cache?key=s")).await; // mirror
    send(&app, get_request("/api/cache?key=none")).await; // miss

    let (status, json) = send(&app, get_request("/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["store_hits"], 1);
    assert_eq!(json["mirror_hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["mirror_entries"], 1);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, get_request("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["store"], "memory");
}

// == FILE STORE ==

#[tokio::test]
async fn test_file_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");

    {
        let store: Arc<dyn PersistentStore> = Arc::new(FileStore::open(&path).await.unwrap());
        let app = create_router(AppState::from_store(store));
        send(&app, add_request(r#"{"key":"durable","value":"yes"}"#)).await;
    }

    let store: Arc<dyn PersistentStore> = Arc::new(FileStore::open(&path).await.unwrap());
    let state = AppState::from_store(store);
    assert_eq!(state.warm_up().await.unwrap(), 1);

    let app = create_router(state);
    let (_, json) = send(&app, get_request("/api/cache/values")).await;
    assert_eq!(json["values"][0], "yes");
}
