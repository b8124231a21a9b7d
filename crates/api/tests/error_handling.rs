//! Tests for `AppError` -> HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no router needed.

use aset_api::error::AppError;
use aset_core::error::CoreError;
use aset_core::validation::FieldIssue;
use aset_db::store::StoreError;
use axum::http::header::ALLOW;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use http_body_util::BodyExt;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Domain errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validation_issues_are_the_message() {
    let err = AppError::Core(CoreError::Validation(vec![FieldIssue::new(
        "too_small",
        "Nopol tidak boleh kosong",
        Some("nopol"),
    )]));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        json["message"],
        serde_json::json!([{
            "code": "too_small",
            "message": "Nopol tidak boleh kosong",
            "path": ["nopol"],
        }])
    );
}

#[tokio::test]
async fn conflict_is_422_with_plain_message() {
    let err = AppError::Core(CoreError::Conflict("Jenis sudah ada".into()));
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json, serde_json::json!({"message": "Jenis sudah ada"}));
}

#[tokio::test]
async fn missing_id_is_422() {
    let err = AppError::Core(CoreError::Required("Id required"));
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["message"], "Id required");
}

#[tokio::test]
async fn unauthorized_is_401() {
    let err = AppError::Core(CoreError::Unauthorized("Missing Authorization header".into()));
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Missing Authorization header");
}

#[tokio::test]
async fn internal_errors_are_sanitized() {
    let err = AppError::Core(CoreError::Internal("argon2 exploded".into()));
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "An internal error occurred");

    let err = AppError::InternalError("pool closed".into());
    let (status, _) = error_to_response(err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

// ---------------------------------------------------------------------------
// Datastore errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn store_error_hides_detail() {
    let err = AppError::Store(StoreError::new("boom").with_detail("secret"));
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json, serde_json::json!({"message": "boom"}));
}

#[tokio::test]
async fn store_error_with_detail_passes_it_through() {
    let err = AppError::StoreWithDetail(
        StoreError::new("violates foreign key").with_detail("Key (id)=(1) is still referenced"),
    );
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["message"], "violates foreign key");
    assert_eq!(json["detail"], "Key (id)=(1) is still referenced");

    let err = AppError::StoreWithDetail(StoreError::new("no detail here"));
    let (_, json) = error_to_response(err).await;
    assert!(json.get("detail").is_none());
}

// ---------------------------------------------------------------------------
// Method not allowed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn method_not_allowed_is_plain_text() {
    let response = AppError::MethodNotAllowed(Method::PATCH).into_response();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[ALLOW], "GET, POST, PUT, DELETE");

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"Method PATCH Not Allowed");
}
