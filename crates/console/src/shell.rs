//! Admin shell: shared client, cache and notifications for every page.

use std::sync::Arc;

use aset_core::types::Record;

use crate::cache::QueryCache;
use crate::client::{ClientError, ResourceClient};
use crate::config::ConsoleConfig;
use crate::page::ResourcePage;
use crate::pages;
use crate::toast::{NotificationCenter, Notifier};

pub struct AdminShell {
    client: ResourceClient,
    cache: Arc<QueryCache>,
    notifier: Notifier,
}

impl AdminShell {
    /// Build the shell and spawn its notification center.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: &ConsoleConfig) -> Self {
        Self {
            client: ResourceClient::new(config),
            cache: Arc::new(QueryCache::new()),
            notifier: NotificationCenter::spawn(),
        }
    }

    /// Page for a resource segment such as `"kendaraan"`. Pages share this
    /// shell's cache, notifications and session token.
    pub fn page(&self, resource: &str) -> Option<ResourcePage> {
        let spec = pages::page(resource)?;
        Some(ResourcePage::new(
            spec,
            self.client.clone(),
            Arc::clone(&self.cache),
            self.notifier.clone(),
        ))
    }

    /// Log in and attach the token to pages opened afterwards.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<Record, ClientError> {
        let outcome = self.client.login(username, password).await?;
        self.client.set_token(Some(outcome.token));
        tracing::info!(username, "Logged in");
        Ok(outcome.user)
    }

    pub fn logout(&mut self) {
        self.client.set_token(None);
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }
}
