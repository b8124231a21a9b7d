#![allow(dead_code)]

use std::sync::Arc;

use aset_api::auth::jwt::JwtConfig;
use aset_api::config::{DatastoreKind, ServerConfig};
use aset_api::router::build_app_router;
use aset_api::state::AppState;
use aset_db::models::memory_store;
use aset_db::store::MemoryTableStore;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-long-enough";

/// Build a test `ServerConfig` with safe defaults: in-memory store, session
/// and audit stages off.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        datastore: DatastoreKind::Memory,
        auth: None,
        audit_log_enabled: false,
    }
}

/// A config with the session stage enabled.
pub fn auth_config() -> ServerConfig {
    ServerConfig {
        auth: Some(JwtConfig {
            secret: TEST_SECRET.to_string(),
            access_token_expiry_mins: 5,
        }),
        ..test_config()
    }
}

/// The full application router over a fresh in-memory store, plus a handle
/// on that store for direct inspection.
pub fn build_test_app_with(config: ServerConfig) -> (Router, Arc<MemoryTableStore>) {
    let store = Arc::new(memory_store());
    let state = AppState::new(store.clone(), config.clone());
    (build_app_router(state, &config), store)
}

pub fn build_test_app() -> Router {
    build_test_app_with(test_config()).0
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

fn json_request(method: Method, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, &body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::PUT, uri, &body)).await
}

/// `POST` with a bearer token.
pub async fn post_json_as(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    let mut request = json_request(Method::POST, uri, &body);
    request
        .headers_mut()
        .insert(AUTHORIZATION, format!("Bearer {token}").parse().unwrap());
    send(app, request).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Id of the first listed record whose `column` equals `value`.
pub async fn find_id(app: Router, path: &str, column: &str, value: &str) -> i64 {
    let rows = body_json(get(app, path).await).await;
    rows.as_array()
        .unwrap()
        .iter()
        .find(|r| r[column] == value)
        .and_then(|r| r["id"].as_i64())
        .unwrap_or_else(|| panic!("no {column}={value} under {path}"))
}
