//! Handler for `POST /api/login`.

use aset_core::error::CoreError;
use aset_core::password::verify_password;
use aset_db::models::user::{UserCredentials, UserInput, UserProfile};
use aset_db::models::Resource;
use aset_db::store::SelectQuery;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::jwt::generate_access_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/login`.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login: a bearer token and the public user record.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid username or password".into(),
    ))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/login
///
/// Verify username + password against `aset_users` and issue an access
/// token. Only available while the session stage is enabled.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let jwt = state.config.auth.as_ref().ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(
            "Authentication is disabled".into(),
        ))
    })?;

    let query = SelectQuery::new()
        .eq("username", input.username.as_str())
        .limit(1);
    let row = state
        .store
        .select(UserInput::SPEC.table, &query)
        .await?
        .into_iter()
        .next()
        .ok_or_else(invalid_credentials)?;

    let user: UserCredentials = serde_json::from_value(Value::Object(row))
        .map_err(|e| AppError::InternalError(format!("Unreadable user row: {e}")))?;

    let valid = verify_password(&input.password, &user.password)
        .map_err(|e| AppError::InternalError(format!("Stored password hash invalid: {e}")))?;
    if !valid {
        tracing::info!(username = %input.username, "Login rejected");
        return Err(invalid_credentials());
    }

    let token = generate_access_token(user.id, &user.username, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}
