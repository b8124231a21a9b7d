//! Optional session stage for resource routes.
//!
//! When `AUTH_ENABLED` is on, `POST`, `PUT` and `DELETE` must carry
//! `Authorization: Bearer <jwt>`. The validated [`Session`] is stored in the
//! request extensions so later stages (the audit hook) can attribute the
//! mutation. Reads are never gated. With auth off the stage passes every
//! request through untouched.

use std::convert::Infallible;

use aset_core::error::CoreError;
use aset_core::types::DbId;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::{HeaderMap, Method};
use axum::middleware::Next;
use axum::response::Response;

use crate::auth::jwt::{validate_token, JwtConfig};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// The user behind a validated bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: DbId,
    pub username: String,
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.into()))
}

/// Resolve the bearer token in `headers` into a [`Session`].
pub fn session_from_headers(headers: &HeaderMap, config: &JwtConfig) -> AppResult<Session> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

    let claims =
        validate_token(token, config).map_err(|_| unauthorized("Invalid or expired token"))?;

    Ok(Session {
        user_id: claims.sub,
        username: claims.username,
    })
}

fn is_mutation(method: &Method) -> bool {
    [Method::POST, Method::PUT, Method::DELETE].contains(method)
}

/// Middleware gating resource mutations behind a session.
///
/// Installed with `axum::middleware::from_fn_with_state` as a route layer on
/// the resource routes.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    if let Some(jwt) = state.config.auth.as_ref() {
        if is_mutation(request.method()) {
            let session = session_from_headers(request.headers(), jwt)?;
            tracing::debug!(user_id = session.user_id, "Session accepted");
            request.extensions_mut().insert(session);
        }
    }
    Ok(next.run(request).await)
}

/// The session attached by [`require_session`], if any.
///
/// Never rejects: with auth disabled (or on reads) this is `MaybeSession(None)`.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Session>);

impl<S> FromRequestParts<S> for MaybeSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(parts.extensions.get::<Session>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use axum::http::HeaderValue;

    use super::*;
    use crate::auth::jwt::generate_access_token;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "session-test-secret".to_string(),
            access_token_expiry_mins: 5,
        }
    }

    #[test]
    fn valid_bearer_token_yields_session() {
        let config = config();
        let token = generate_access_token(7, "operator", &config).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );

        let session = session_from_headers(&headers, &config).unwrap();
        assert_eq!(
            session,
            Session {
                user_id: 7,
                username: "operator".into()
            }
        );
    }

    #[test]
    fn missing_or_malformed_header_is_unauthorized() {
        let config = config();
        assert_matches!(
            session_from_headers(&HeaderMap::new(), &config),
            Err(AppError::Core(CoreError::Unauthorized(_)))
        );

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Token abc"));
        assert_matches!(
            session_from_headers(&headers, &config),
            Err(AppError::Core(CoreError::Unauthorized(_)))
        );
    }

    #[test]
    fn only_writes_are_gated() {
        assert!(is_mutation(&Method::POST));
        assert!(is_mutation(&Method::DELETE));
        assert!(!is_mutation(&Method::GET));
        assert!(!is_mutation(&Method::PATCH));
    }
}
