//! Static descriptors for CRUD resources.
//!
//! Every entity exposed under `/api/<path>` is described by one
//! [`ResourceSpec`]: which table backs it, which payload fields it declares,
//! how lists are ordered, which columns reads may return, and (for dictionary
//! resources) which column must stay unique.

use serde_json::Value;

use crate::error::CoreError;
use crate::types::DbId;

/// Name of the surrogate identifier column shared by every resource table.
pub const ID_COLUMN: &str = "id";

/// Message returned when an operation needs an identifier that was not given.
pub const ID_REQUIRED: &str = "Id required";

// ---------------------------------------------------------------------------
// Descriptor types
// ---------------------------------------------------------------------------

/// Sort applied to list reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: &'static str,
    pub descending: bool,
}

impl OrderBy {
    pub const fn asc(column: &'static str) -> Self {
        Self {
            column,
            descending: false,
        }
    }

    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            descending: true,
        }
    }
}

/// Default ordering: identifier ascending.
pub const BY_ID: OrderBy = OrderBy::asc(ID_COLUMN);

/// A human-meaningful column that must be unique within its table.
///
/// Uniqueness is checked by reading before writing; there is no database
/// constraint behind it, so two concurrent writers can both pass the check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NaturalKey {
    pub column: &'static str,
    /// Message returned to the caller when the value is already taken.
    pub conflict_message: &'static str,
}

/// Configuration of one CRUD resource.
#[derive(Debug, Clone, Copy)]
pub struct ResourceSpec {
    /// Singular name used in success messages (`"Success add tahun"`).
    pub name: &'static str,
    /// Route segment under `/api` (`"tahun"`, `"users"`).
    pub path: &'static str,
    /// Backing table in the datastore.
    pub table: &'static str,
    /// Declared payload fields, in schema order. Issue lists follow this order.
    pub fields: &'static [&'static str],
    /// Columns returned by reads. `None` returns every column.
    pub columns: Option<&'static [&'static str]>,
    pub order: OrderBy,
    pub natural_key: Option<NaturalKey>,
}

impl ResourceSpec {
    /// Route path relative to the API root, e.g. `/tahun`.
    pub fn route(&self) -> String {
        format!("/{}", self.path)
    }

    pub fn created_message(&self) -> String {
        format!("Success add {}", self.name)
    }

    pub fn updated_message(&self) -> String {
        format!("Success update {}", self.name)
    }

    pub fn deleted_message(&self) -> String {
        format!("Success delete {}", self.name)
    }

    /// Position of `field` in the declared schema, used to order issues.
    pub fn field_position(&self, field: &str) -> usize {
        self.fields
            .iter()
            .position(|f| *f == field)
            .unwrap_or(self.fields.len())
    }
}

// ---------------------------------------------------------------------------
// Identifier parsing
// ---------------------------------------------------------------------------

/// Parse an identifier supplied as a query-string value.
///
/// Blank values count as absent and yield `Ok(None)`.
pub fn parse_id(raw: Option<&str>) -> Result<Option<DbId>, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<DbId>()
            .map(Some)
            .map_err(|_| CoreError::InvalidId(value.to_string())),
    }
}

/// Read the identifier carried inside a JSON body (`{"id": 3}` or `{"id": "3"}`).
pub fn id_from_body(body: &Value) -> Result<Option<DbId>, CoreError> {
    match body.get(ID_COLUMN) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| CoreError::InvalidId(n.to_string())),
        Some(Value::String(s)) => parse_id(Some(s)),
        Some(other) => Err(CoreError::InvalidId(other.to_string())),
    }
}
