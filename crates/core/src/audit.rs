//! Audit log vocabulary.
//!
//! Audit logging is optional; when enabled, every successful mutation writes
//! one entry naming the action, the resource and (when known) the entity id.

use serde::Serialize;

/// Table that receives audit entries.
pub const AUDIT_TABLE: &str = "aset_logs";

/// Mutation kinds recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
