//! Table-oriented datastore collaborator.
//!
//! Handlers never speak SQL directly: they address a table by name and issue
//! one of four operations (filtered/ordered select, insert, update by id,
//! delete by id) through [`TableStore`]. Two implementations exist:
//!
//! - [`PgTableStore`] over a sqlx PostgreSQL pool (production).
//! - [`MemoryTableStore`] held in process (tests, `DATASTORE=memory`).
//!
//! Table and column names are always `&'static str` taken from resource
//! descriptors, never from request input.

mod memory;
mod postgres;

pub use memory::{MemoryTableStore, Reference};
pub use postgres::PgTableStore;

use aset_core::resource::{OrderBy, ID_COLUMN};
use aset_core::types::{DbId, Record};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure reported by the datastore.
///
/// Shaped like a PostgREST error object so the API can hand `message` and
/// `detail` back to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
    /// Extra context from the engine, e.g. which key is still referenced.
    pub detail: Option<String>,
    /// Engine error code (SQLSTATE for PostgreSQL).
    pub code: Option<String>,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: None,
            code: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Equality filter on one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: &'static str,
    pub value: Value,
}

/// A read against one table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectQuery {
    /// Columns to return; `None` returns every column.
    pub columns: Option<&'static [&'static str]>,
    pub filter: Option<Filter>,
    pub order: Option<OrderBy>,
    pub limit: Option<i64>,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(mut self, columns: Option<&'static [&'static str]>) -> Self {
        self.columns = columns;
        self
    }

    pub fn eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.filter = Some(Filter {
            column,
            value: value.into(),
        });
        self
    }

    pub fn by_id(self, id: DbId) -> Self {
        self.eq(ID_COLUMN, id)
    }

    pub fn order(mut self, order: OrderBy) -> Self {
        self.order = Some(order);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Text form of a scalar, used for equality comparisons.
///
/// Both backends compare filter values as text so `3` and `"3"` address the
/// same row.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A backend reachable by table name.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Read rows matching `query`.
    async fn select(&self, table: &'static str, query: &SelectQuery)
        -> Result<Vec<Record>, StoreError>;

    /// Insert one row and return its new identifier.
    async fn insert(&self, table: &'static str, row: Record) -> Result<DbId, StoreError>;

    /// Overwrite the given columns of the row with `id`. Returns rows affected.
    async fn update(&self, table: &'static str, id: DbId, row: Record)
        -> Result<u64, StoreError>;

    /// Delete the row with `id`. Returns rows affected.
    async fn delete(&self, table: &'static str, id: DbId) -> Result<u64, StoreError>;

    /// Confirm the backend is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;
}
