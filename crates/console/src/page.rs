//! Resource list page.
//!
//! A [`ResourcePage`] fetches its resource's list through the shared
//! [`QueryCache`], filters it by the debounced search term, and runs the
//! create, edit and delete dialogs. Every submission pushes a loading
//! notification first and then resolves it:
//!
//! - success: close the dialog, reset its draft, turn the loading toast into
//!   a success toast carrying the server message, invalidate and refetch;
//! - itemised validation failure: dismiss all toasts, then push one error
//!   per issue, last issue first;
//! - any other failure: turn the loading toast into an error (for delete,
//!   the server `detail` wins over its `message`).
//!
//! Submissions take `&mut self`, so a page has at most one request in flight.

use std::sync::Arc;
use std::time::Instant;

use aset_core::search;
use aset_core::types::{DbId, Record};
use serde_json::Value;

use crate::cache::{QueryCache, Rows};
use crate::client::{ClientError, ErrorMessage, ResourceClient};
use crate::debounce::{Debounced, SEARCH_DEBOUNCE};
use crate::pages::PageSpec;
use crate::table::{cell_text, TableView};
use crate::toast::{Notifier, ToastId, ToastKind};

#[derive(Debug, Clone)]
pub enum LoadState {
    Pending,
    Ready(Rows),
    /// Fetch failed; carries the error for diagnostics.
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
    Create,
    Edit,
    Delete,
}

/// One modal dialog: whether it is open and the record it edits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dialog {
    pub open: bool,
    pub draft: Record,
}

impl Dialog {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

pub struct ResourcePage {
    spec: &'static PageSpec,
    client: ResourceClient,
    cache: Arc<QueryCache>,
    notifier: Notifier,
    load: LoadState,
    search: Debounced<String>,
    create: Dialog,
    edit: Dialog,
    delete: Dialog,
}

impl ResourcePage {
    pub fn new(
        spec: &'static PageSpec,
        client: ResourceClient,
        cache: Arc<QueryCache>,
        notifier: Notifier,
    ) -> Self {
        Self {
            spec,
            client,
            cache,
            notifier,
            load: LoadState::Pending,
            search: Debounced::new(String::new(), SEARCH_DEBOUNCE),
            create: Dialog::default(),
            edit: Dialog::default(),
            delete: Dialog::default(),
        }
    }

    pub fn spec(&self) -> &'static PageSpec {
        self.spec
    }

    // ---- loading ----

    /// Initial fetch. Equivalent to [`reload`](Self::reload).
    pub async fn mount(&mut self) {
        self.reload().await;
    }

    /// Read the list through the cache (a miss goes to the server).
    pub async fn reload(&mut self) {
        let resource = self.spec.resource;
        let client = &self.client;
        let result = self
            .cache
            .get_or_fetch(resource, || client.list(resource))
            .await;

        self.load = match result {
            Ok(rows) => LoadState::Ready(rows),
            Err(err) => {
                tracing::warn!(resource, error = %err, "List fetch failed");
                LoadState::Failed(err.to_string())
            }
        };
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    // ---- search ----

    /// Record a keystroke in the search box at `now`.
    pub fn set_search(&mut self, text: impl Into<String>, now: Instant) {
        self.search.set(text.into(), now);
    }

    /// Apply the pending search term if it has settled. Returns whether the
    /// visible records may have changed.
    pub fn poll_search(&mut self, now: Instant) -> bool {
        self.search.poll(now)
    }

    /// When the pending search term settles, for scheduling the next poll.
    pub fn search_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    /// The settled search term.
    pub fn search_term(&self) -> &str {
        self.search.value()
    }

    /// Fetched records matching the settled search term, in server order.
    pub fn visible_records(&self) -> Vec<&Record> {
        let LoadState::Ready(rows) = &self.load else {
            return Vec::new();
        };
        let term = self.search.value();
        rows.iter()
            .filter(|record| {
                term.is_empty()
                    || self
                        .spec
                        .search_fields
                        .iter()
                        .any(|f| search::matches(&cell_text(record.get(*f)), term))
            })
            .collect()
    }

    pub fn table(&self) -> TableView {
        match &self.load {
            LoadState::Pending => TableView::pending(self.spec),
            LoadState::Failed(_) => TableView::failed(self.spec),
            LoadState::Ready(_) => TableView::rows(self.spec, self.visible_records()),
        }
    }

    // ---- dialogs ----

    pub fn dialog(&self, mode: DialogMode) -> &Dialog {
        match mode {
            DialogMode::Create => &self.create,
            DialogMode::Edit => &self.edit,
            DialogMode::Delete => &self.delete,
        }
    }

    fn dialog_mut(&mut self, mode: DialogMode) -> &mut Dialog {
        match mode {
            DialogMode::Create => &mut self.create,
            DialogMode::Edit => &mut self.edit,
            DialogMode::Delete => &mut self.delete,
        }
    }

    /// Open the create dialog with an empty draft.
    pub fn open_create(&mut self) {
        self.create = Dialog {
            open: true,
            draft: Record::new(),
        };
    }

    /// Open the edit dialog on a copy of `record`.
    pub fn open_edit(&mut self, record: &Record) {
        self.edit = Dialog {
            open: true,
            draft: record.clone(),
        };
    }

    /// Open the delete confirmation for `record`.
    pub fn open_delete(&mut self, record: &Record) {
        self.delete = Dialog {
            open: true,
            draft: record.clone(),
        };
    }

    /// Close a dialog, keeping its draft.
    pub fn close(&mut self, mode: DialogMode) {
        self.dialog_mut(mode).open = false;
    }

    /// Set one draft field.
    pub fn set_field(&mut self, mode: DialogMode, field: &str, value: impl Into<Value>) {
        self.dialog_mut(mode)
            .draft
            .insert(field.to_string(), value.into());
    }

    // ---- submissions ----

    pub async fn submit_create(&mut self) -> bool {
        self.submit(DialogMode::Create).await
    }

    pub async fn submit_edit(&mut self) -> bool {
        self.submit(DialogMode::Edit).await
    }

    pub async fn submit_delete(&mut self) -> bool {
        self.submit(DialogMode::Delete).await
    }

    /// Send the dialog's draft. Returns whether the server accepted it.
    async fn submit(&mut self, mode: DialogMode) -> bool {
        let resource = self.spec.resource;
        let draft = self.dialog(mode).draft.clone();
        let toast = self.notifier.loading(self.loading_message(mode, &draft));

        let result = match mode {
            DialogMode::Create => self.client.create(resource, &draft).await,
            DialogMode::Edit => self.client.update(resource, &draft).await,
            DialogMode::Delete => self.client.delete(resource, draft_id(&draft)).await,
        };

        match result {
            Ok(message) => {
                self.dialog_mut(mode).reset();
                self.notifier.update(toast, ToastKind::Success, message);
                self.cache.invalidate(resource).await;
                self.reload().await;
                true
            }
            Err(err) => {
                tracing::warn!(resource, ?mode, error = %err, "Submission rejected");
                self.report_failure(toast, mode, err);
                false
            }
        }
    }

    fn loading_message(&self, mode: DialogMode, draft: &Record) -> String {
        let label = cell_text(draft.get(self.spec.label_field));
        match mode {
            DialogMode::Create => format!("Menyimpan {label}"),
            DialogMode::Edit => format!("Memperbarui {}", self.spec.title),
            DialogMode::Delete => format!("Menghapus {label}"),
        }
    }

    fn report_failure(&self, toast: ToastId, mode: DialogMode, err: ClientError) {
        let ClientError::Rejected { body, .. } = err else {
            self.notifier.update(toast, ToastKind::Error, err.summary());
            return;
        };

        if mode == DialogMode::Delete {
            if let Some(detail) = body.detail {
                self.notifier.update(toast, ToastKind::Error, detail);
                return;
            }
        }

        match body.message {
            ErrorMessage::Issues(issues) if mode != DialogMode::Delete => {
                self.notifier.dismiss_all();
                for issue in issues.iter().rev() {
                    self.notifier.error(issue.message.clone());
                }
            }
            ErrorMessage::Issues(issues) => {
                let text = issues
                    .iter()
                    .map(|i| i.message.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                self.notifier.update(toast, ToastKind::Error, text);
            }
            ErrorMessage::Text(text) => self.notifier.update(toast, ToastKind::Error, text),
        }
    }
}

/// The draft's `id`, as a number or numeric string.
fn draft_id(draft: &Record) -> Option<DbId> {
    match draft.get("id")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
