//! Per-resource cache of list results.
//!
//! Pages read their list through [`QueryCache::get_or_fetch`]; every
//! successful mutation invalidates the resource's key so the next read goes
//! back to the server. Entries are never patched in place.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use aset_core::types::Record;
use tokio::sync::Mutex;

use crate::client::ClientError;

/// A cached list result.
pub type Rows = Arc<Vec<Record>>;

#[derive(Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<String, Rows>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached rows for `key`, running `fetch` on a miss.
    ///
    /// Failed fetches are not cached.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<Rows, ClientError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Record>, ClientError>>,
    {
        if let Some(rows) = self.peek(key).await {
            return Ok(rows);
        }

        let rows = Arc::new(fetch().await?);
        self.entries
            .lock()
            .await
            .insert(key.to_string(), Arc::clone(&rows));
        tracing::debug!(key, count = rows.len(), "Cached list");
        Ok(rows)
    }

    pub async fn peek(&self, key: &str) -> Option<Rows> {
        self.entries.lock().await.get(key).cloned()
    }

    /// Drop the entry for `key`; the next read refetches.
    pub async fn invalidate(&self, key: &str) {
        if self.entries.lock().await.remove(key).is_some() {
            tracing::debug!(key, "Invalidated list");
        }
    }
}
