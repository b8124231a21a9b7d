use std::sync::Arc;

use aset_db::store::TableStore;

use crate::audit::{AuditSink, StoreAuditSink};
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The datastore every resource route reads and writes.
    pub store: Arc<dyn TableStore>,
    pub config: Arc<ServerConfig>,
    /// Receives one entry per successful mutation; `None` when audit logging is off.
    pub audit: Option<Arc<dyn AuditSink>>,
}

impl AppState {
    /// Assemble state, wiring the audit stage to the same store when enabled.
    pub fn new(store: Arc<dyn TableStore>, config: ServerConfig) -> Self {
        let audit: Option<Arc<dyn AuditSink>> = if config.audit_log_enabled {
            Some(Arc::new(StoreAuditSink::new(Arc::clone(&store))))
        } else {
            None
        };

        Self {
            store,
            config: Arc::new(config),
            audit,
        }
    }
}
