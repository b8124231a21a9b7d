//! Optional audit stage.
//!
//! After a successful mutation the resource handler hands an [`AuditEntry`]
//! to the configured [`AuditSink`]. The stock sink appends a row to
//! `aset_logs` through the same [`TableStore`] the resources use.

use std::sync::Arc;

use aset_core::audit::{AuditAction, AUDIT_TABLE};
use aset_core::types::{DbId, Record};
use aset_db::store::{StoreError, TableStore};
use async_trait::async_trait;
use serde_json::Value;

/// One mutation to record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub action: AuditAction,
    /// Resource name, e.g. `"kendaraan"`.
    pub resource: &'static str,
    pub entity_id: Option<DbId>,
    /// The session user, when the session stage is enabled.
    pub user_id: Option<DbId>,
}

/// Destination for audit entries.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, entry: AuditEntry) -> Result<(), StoreError>;
}

/// Writes entries into the `aset_logs` table.
pub struct StoreAuditSink {
    store: Arc<dyn TableStore>,
}

impl StoreAuditSink {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }
}

fn entry_row(entry: &AuditEntry) -> Record {
    let mut row = Record::new();
    row.insert("user_id".into(), Value::from(entry.user_id));
    row.insert("action".into(), Value::from(entry.action.as_str()));
    row.insert("resource".into(), Value::from(entry.resource));
    row.insert("entity_id".into(), Value::from(entry.entity_id));
    row.insert(
        "created_at".into(),
        Value::from(chrono::Utc::now().to_rfc3339()),
    );
    row
}

#[async_trait]
impl AuditSink for StoreAuditSink {
    async fn record(&self, entry: AuditEntry) -> Result<(), StoreError> {
        let id = self.store.insert(AUDIT_TABLE, entry_row(&entry)).await?;
        tracing::debug!(
            audit_id = id,
            action = %entry.action,
            resource = entry.resource,
            entity_id = ?entry.entity_id,
            "Audit entry written",
        );
        Ok(())
    }
}
