use aset_core::error::CoreError;
use aset_db::store::StoreError;
use axum::http::header::ALLOW;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};

/// Methods every resource route answers.
pub const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for datastore
/// failures. Implements [`IntoResponse`] to produce the `{ "message": ... }`
/// bodies the admin console understands.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `aset_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A datastore failure; only the message is returned.
    #[error("Datastore error: {0}")]
    Store(#[from] StoreError),

    /// A datastore failure returned with its `detail` as well.
    #[error("Datastore error: {0}")]
    StoreWithDetail(StoreError),

    #[error("Method {0} Not Allowed")]
    MethodNotAllowed(Method),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message): (StatusCode, Value) = match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(issues) => (StatusCode::UNPROCESSABLE_ENTITY, json!(issues)),
                CoreError::Required(msg) => (StatusCode::UNPROCESSABLE_ENTITY, json!(msg)),
                err @ CoreError::InvalidId(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, json!(err.to_string()))
                }
                CoreError::Conflict(msg) => (StatusCode::UNPROCESSABLE_ENTITY, json!(msg)),
                CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, json!(msg)),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        json!("An internal error occurred"),
                    )
                }
            },

            // --- Datastore errors ---
            AppError::Store(err) => {
                tracing::warn!(error = %err.message, code = ?err.code, "Datastore rejected request");
                (StatusCode::UNPROCESSABLE_ENTITY, json!(err.message))
            }
            AppError::StoreWithDetail(err) => {
                tracing::warn!(
                    error = %err.message,
                    detail = ?err.detail,
                    code = ?err.code,
                    "Datastore rejected request",
                );
                let mut body = json!({ "message": err.message });
                if let Some(detail) = err.detail {
                    body["detail"] = json!(detail);
                }
                return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(body)).into_response();
            }

            // --- HTTP-specific errors ---
            AppError::MethodNotAllowed(method) => {
                return (
                    StatusCode::METHOD_NOT_ALLOWED,
                    [(ALLOW, ALLOWED_METHODS)],
                    format!("Method {method} Not Allowed"),
                )
                    .into_response();
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!("An internal error occurred"),
                )
            }
        };

        (status, axum::Json(json!({ "message": message }))).into_response()
    }
}
