//! Admin users (`aset_users`).
//!
//! Passwords are hashed before they reach the datastore and are never part
//! of a read projection. Every user created here gets `type = 'admin'`.

use aset_core::error::CoreError;
use aset_core::password::hash_password;
use aset_core::resource::{NaturalKey, ResourceSpec, BY_ID};
use aset_core::types::{DbId, Record};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::Resource;

/// Value written to the `type` column.
pub const ADMIN_TYPE: &str = "admin";

/// Columns safe to return to clients.
pub const PUBLIC_COLUMNS: &[&str] = &["id", "name", "username"];

#[derive(Clone, Deserialize, Serialize, Validate)]
pub struct UserInput {
    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Name is required")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Username is required")
    )]
    pub username: Option<String>,
    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Password is required")
    )]
    pub password: Option<String>,
}

impl std::fmt::Debug for UserInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserInput")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl Resource for UserInput {
    const SPEC: ResourceSpec = ResourceSpec {
        name: "user",
        path: "users",
        table: "aset_users",
        fields: &["name", "username", "password"],
        columns: Some(PUBLIC_COLUMNS),
        order: BY_ID,
        natural_key: Some(NaturalKey {
            column: "username",
            conflict_message: "Username already exist",
        }),
    };

    fn into_record(self) -> Result<Record, CoreError> {
        let password = self.password.unwrap_or_default();
        let hash = hash_password(&password)
            .map_err(|e| CoreError::Internal(format!("Password hashing failed: {e}")))?;

        let mut record = Record::new();
        record.insert("name".into(), Value::from(self.name));
        record.insert("username".into(), Value::from(self.username));
        record.insert("password".into(), Value::from(hash));
        record.insert("type".into(), Value::from(ADMIN_TYPE));
        Ok(record)
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// A full `aset_users` row, including the password hash. Only used to check
/// credentials at login.
#[derive(Clone, Deserialize)]
pub struct UserCredentials {
    pub id: DbId,
    pub name: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCredentials")
            .field("id", &self.id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// The public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: DbId,
    pub name: String,
    pub username: String,
}

impl From<UserCredentials> for UserProfile {
    fn from(user: UserCredentials) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
        }
    }
}

#[cfg(test)]
mod tests {
    use aset_core::password::verify_password;
    use serde_json::json;

    use super::*;

    fn input() -> UserInput {
        UserInput::from_json(json!({
            "name": "Admin BPKAD",
            "username": "admin",
            "password": "rahasia",
        }))
        .unwrap()
    }

    #[test]
    fn record_carries_hash_and_admin_type() {
        let record = input().into_record().unwrap();
        let hash = record["password"].as_str().unwrap();
        assert_ne!(hash, "rahasia");
        assert!(verify_password("rahasia", hash).unwrap());
        assert_eq!(record["type"], ADMIN_TYPE);
        assert_eq!(record["username"], "admin");
    }

    #[test]
    fn debug_output_hides_password() {
        let rendered = format!("{:?}", input());
        assert!(!rendered.contains("rahasia"));
    }

    #[test]
    fn projection_excludes_password() {
        let columns = UserInput::SPEC.columns.unwrap();
        assert!(!columns.contains(&"password"));
    }
}
