//! Session tokens: HS256 JWTs naming the logged-in admin user.
//!
//! No refresh flow; an expired token means logging in again.

use aset_core::types::DbId;
use jsonwebtoken::errors::Error as JwtError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default token lifetime in minutes.
const DEFAULT_EXPIRY_MINS: i64 = 60;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// `aset_users.id` of the session owner.
    pub sub: DbId,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
    /// Per-token id, so two logins in the same second differ.
    pub jti: String,
}

impl Claims {
    fn issued_now(user_id: DbId, username: &str, lifetime_mins: i64) -> Self {
        let iat = chrono::Utc::now().timestamp();
        Self {
            sub: user_id,
            username: username.to_string(),
            exp: iat + lifetime_mins * 60,
            iat,
            jti: Uuid::new_v4().to_string(),
        }
    }
}

/// Signing secret and token lifetime for the session stage.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// | Env Var           | Required | Default |
    /// |-------------------|----------|---------|
    /// | `JWT_SECRET`      | **yes**  | --      |
    /// | `JWT_EXPIRY_MINS` | no       | `60`    |
    ///
    /// Only read when `AUTH_ENABLED` is on.
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is missing or empty, or `JWT_EXPIRY_MINS` is
    /// not an integer.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set when AUTH_ENABLED is on");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins = match std::env::var("JWT_EXPIRY_MINS") {
            Ok(raw) => raw.parse().expect("JWT_EXPIRY_MINS must be an integer"),
            Err(_) => DEFAULT_EXPIRY_MINS,
        };

        Self {
            secret,
            access_token_expiry_mins,
        }
    }
}

/// Sign a token for `user_id` valid for the configured lifetime.
pub fn generate_access_token(
    user_id: DbId,
    username: &str,
    config: &JwtConfig,
) -> Result<String, JwtError> {
    let claims = Claims::issued_now(user_id, username, config.access_token_expiry_mins);
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check signature and expiry, returning the claims.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, JwtError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}
