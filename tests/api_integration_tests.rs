//! Integration Tests for API Endpoints
//!
//! Drives full requests through the router against a mocked consistency
//! authority.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use edge_orchestrator::{
    api::{create_router, CONSISTENCY_HEADER},
    cache::{CacheStore, LocalCache},
    reconcile::HttpOracle,
    AppState, ProtocolConfig,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// == Helper Functions ==

fn create_test_app(authority: &MockServer, tweak: impl FnOnce(&mut ProtocolConfig)) -> Router {
    let mut protocol = ProtocolConfig {
        remote_url: format!("{}/check", authority.uri()),
        ..ProtocolConfig::default()
    };
    tweak(&mut protocol);

    let cache = LocalCache::new(CacheStore::new(100, 300), 300);
    let oracle = HttpOracle::new(Duration::from_secs(2)).unwrap();
    create_router(AppState::new(cache, Arc::new(oracle), protocol))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn seed(app: &Router, entry: Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/entries")
                .header("content-type", "application/json")
                .body(Body::from(entry.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

fn post(id: u64, version: i64) -> Value {
    json!({
        "ID": id,
        "Key": format!("post:{id}"),
        "Value": {"title": format!("post {id}")},
        "Version": version
    })
}

fn rendered(posts: &[Value]) -> Value {
    let posts: Vec<Value> = posts
        .iter()
        .map(|p| {
            json!({
                "id": p["ID"],
                "key": p["Key"],
                "version": p["Version"],
                "value": p["Value"],
            })
        })
        .collect();
    json!({"count": posts.len(), "posts": posts})
}

// == Reconciliation Scenarios ==

#[tokio::test]
async fn test_fresh_cache_serves_local_render() {
    let authority = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/check"))
        .and(body_json(json!({
            "versions": {"post:1": 5, "post:2": 5},
            "function": "get_index",
            "args": {"page_num": 1, "page_size": 2}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"checkResult": true})))
        .expect(1)
        .mount(&authority)
        .await;

    let app = create_test_app(&authority, |_| {});
    seed(&app, post(1, 5)).await;
    seed(&app, post(2, 5)).await;

    let response = get(&app, "/?page_num=1&page_size=2").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONSISTENCY_HEADER], "passed");
    assert_eq!(
        response.headers()["content-type"],
        "application/json;charset=UTF-8"
    );
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body, rendered(&[post(1, 5), post(2, 5)]));
}

#[tokio::test]
async fn test_stale_cache_serves_authority_and_repairs() {
    let authority = MockServer::start().await;
    let updated = json!({"ID": 1, "Key": "post:1", "Value": {"title": "edited"}, "Version": 4});
    Mock::given(method("POST"))
        .and(path("/check"))
        .and(body_partial_json(json!({"versions": {"post:1": 3}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "checkResult": false,
            "result": "<renderedPageV4>",
            "updatedKeys": [updated]
        })))
        .mount(&authority)
        .await;

    let app = create_test_app(&authority, |_| {});
    seed(&app, post(1, 3)).await;

    let response = get(&app, "/posts?page_size=1").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONSISTENCY_HEADER], "failed");
    assert_eq!(body_to_json(response.into_body()).await, json!("<renderedPageV4>"));

    let cached = get(&app, "/entries/post:1").await;
    assert_eq!(cached.status(), StatusCode::OK);
    let cached = body_to_json(cached.into_body()).await;
    assert_eq!(cached["Version"], 4);
    assert_eq!(cached["Value"]["title"], "edited");
}

#[tokio::test]
async fn test_disabled_verification_makes_no_outbound_call() {
    let authority = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"checkResult": true})))
        .expect(0)
        .mount(&authority)
        .await;

    let app = create_test_app(&authority, |p| p.do_consistency_check = false);
    seed(&app, post(1, 1)).await;

    let response = get(&app, "/?page_size=1").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONSISTENCY_HEADER], "passed");
    assert_eq!(body_to_json(response.into_body()).await, rendered(&[post(1, 1)]));
}

#[tokio::test]
async fn test_missing_dependency_serves_authority_value() {
    let authority = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"versions": {"post:1": 2, "post:2": -1}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "checkResult": false,
            "result": {"from": "authority"},
            "updatedKeys": [post(2, 1)]
        })))
        .expect(1)
        .mount(&authority)
        .await;

    let app = create_test_app(&authority, |_| {});
    seed(&app, post(1, 2)).await;

    let response = get(&app, "/?page_size=2").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response.into_body()).await, json!({"from": "authority"}));
    assert_eq!(get(&app, "/entries/post:2").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_full_fault_injection_reports_missing_versions() {
    let authority = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"versions": {"post:1": -1}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"checkResult": true})))
        .expect(1)
        .mount(&authority)
        .await;

    let app = create_test_app(&authority, |p| {
        p.cold_miss_prob = 1.0;
        p.cap_miss_prob = 0.0;
    });
    seed(&app, post(1, 8)).await;

    let response = get(&app, "/?page_size=1").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response.into_body()).await, rendered(&[post(1, 8)]));
}

#[tokio::test]
async fn test_default_page_arguments_sent_to_authority() {
    let authority = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"args": {"page_num": 1, "page_size": 20}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "checkResult": false,
            "result": [],
            "updatedKeys": []
        })))
        .expect(1)
        .mount(&authority)
        .await;

    let app = create_test_app(&authority, |_| {});

    let response = get(&app, "/?page_num=abc").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response.into_body()).await, json!([]));
}

#[tokio::test]
async fn test_zero_page_checked_as_first_page() {
    let authority = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/check"))
        .and(body_json(json!({
            "versions": {"post:1": 1},
            "function": "get_index",
            "args": {"page_num": 1, "page_size": 1}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"checkResult": true})))
        .expect(1)
        .mount(&authority)
        .await;

    let app = create_test_app(&authority, |_| {});
    seed(&app, post(1, 1)).await;

    let response = get(&app, "/?page_num=0&page_size=1").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response.into_body()).await, rendered(&[post(1, 1)]));
}

// == Failure Surfaces ==

#[tokio::test]
async fn test_authority_error_is_bad_gateway() {
    let authority = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&authority)
        .await;

    let app = create_test_app(&authority, |_| {});
    seed(&app, post(1, 1)).await;

    let response = get(&app, "/?page_size=1").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_to_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("500"));
}

#[tokio::test]
async fn test_authority_error_degrades_when_enabled() {
    let authority = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&authority)
        .await;

    let app = create_test_app(&authority, |p| p.degrade_on_oracle_failure = true);
    seed(&app, post(1, 1)).await;

    let response = get(&app, "/?page_size=1").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response.into_body()).await, rendered(&[post(1, 1)]));
}

#[tokio::test]
async fn test_oversized_page_rejected() {
    let authority = MockServer::start().await;
    let app = create_test_app(&authority, |_| {});

    let response = get(&app, "/?page_size=100000").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// == Entry and Stats Endpoints ==

#[tokio::test]
async fn test_entries_listing_and_delete() {
    let authority = MockServer::start().await;
    let app = create_test_app(&authority, |_| {});
    seed(&app, post(2, 1)).await;
    seed(&app, post(1, 1)).await;

    let listing = body_to_json(get(&app, "/entries").await.into_body()).await;
    assert_eq!(listing["count"], 2);
    assert_eq!(listing["keys"], json!(["post:1", "post:2"]));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/entries/post:1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get(&app, "/entries/post:1").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_put_entry_rejects_malformed_body() {
    let authority = MockServer::start().await;
    let app = create_test_app(&authority, |_| {});

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/entries")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"Key":"post:1"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_stats_after_stale_request() {
    let authority = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "checkResult": false,
            "result": "page",
            "updatedKeys": [post(1, 2)]
        })))
        .mount(&authority)
        .await;

    let app = create_test_app(&authority, |_| {});
    seed(&app, post(1, 1)).await;
    get(&app, "/?page_size=1").await;

    let stats = body_to_json(get(&app, "/stats").await.into_body()).await;
    assert_eq!(stats["reconcile"]["requests"], 1);
    assert_eq!(stats["reconcile"]["stale"], 1);
    assert_eq!(stats["reconcile"]["repaired_entries"], 1);
    assert_eq!(stats["cache"]["writes"], 2);
}

#[tokio::test]
async fn test_health_endpoint() {
    let authority = MockServer::start().await;
    let app = create_test_app(&authority, |_| {});

    let response = get(&app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
}
