//! Notification queue.
//!
//! A single [`NotificationCenter`] task owns the list of visible toasts and
//! applies [`ToastCommand`]s received over a `tokio::sync::mpsc` channel in
//! order. Every change is published as a snapshot on a `watch` channel for
//! whatever renders them. Pages talk to it through a cloneable [`Notifier`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};

pub type ToastId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub message: String,
}

/// Instructions accepted by the [`NotificationCenter`].
#[derive(Debug)]
pub enum ToastCommand {
    Push(Toast),
    /// Replace kind and message of an existing toast. Unknown ids are ignored.
    Update {
        id: ToastId,
        kind: ToastKind,
        message: String,
    },
    /// Dismiss one toast, or all of them with `None`.
    Dismiss(Option<ToastId>),
    /// Reply with the current toasts once every earlier command is applied.
    Snapshot(oneshot::Sender<Vec<Toast>>),
}

// ---------------------------------------------------------------------------
// NotificationCenter
// ---------------------------------------------------------------------------

/// Owner of the visible toasts, in push order.
pub struct NotificationCenter {
    commands: mpsc::UnboundedReceiver<ToastCommand>,
    snapshots: watch::Sender<Vec<Toast>>,
    toasts: Vec<Toast>,
}

impl NotificationCenter {
    /// Create a center and the handle that feeds it. Run it with [`run`](Self::run).
    pub fn new() -> (Self, Notifier) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(Vec::new());

        let center = Self {
            commands: command_rx,
            snapshots: snapshot_tx,
            toasts: Vec::new(),
        };
        let notifier = Notifier {
            commands: command_tx,
            snapshots: snapshot_rx,
            next_id: Arc::new(AtomicU64::new(1)),
        };
        (center, notifier)
    }

    /// Create a center and spawn it on the current tokio runtime.
    pub fn spawn() -> Notifier {
        let (center, notifier) = Self::new();
        tokio::spawn(center.run());
        notifier
    }

    /// Apply commands until every [`Notifier`] is dropped.
    pub async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            if self.apply(command) {
                self.snapshots.send_replace(self.toasts.clone());
            }
        }
        tracing::debug!("Notification center stopped");
    }

    /// Returns whether the visible toasts changed.
    fn apply(&mut self, command: ToastCommand) -> bool {
        match command {
            ToastCommand::Push(toast) => {
                self.toasts.push(toast);
                true
            }
            ToastCommand::Update { id, kind, message } => {
                match self.toasts.iter_mut().find(|t| t.id == id) {
                    Some(toast) => {
                        toast.kind = kind;
                        toast.message = message;
                        true
                    }
                    None => false,
                }
            }
            ToastCommand::Dismiss(Some(id)) => {
                let before = self.toasts.len();
                self.toasts.retain(|t| t.id != id);
                self.toasts.len() != before
            }
            ToastCommand::Dismiss(None) => {
                let changed = !self.toasts.is_empty();
                self.toasts.clear();
                changed
            }
            ToastCommand::Snapshot(reply) => {
                let _ = reply.send(self.toasts.clone());
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

/// Cloneable handle for pushing notifications.
///
/// Sends never fail from the caller's point of view: once the center has
/// stopped, commands are dropped.
#[derive(Clone)]
pub struct Notifier {
    commands: mpsc::UnboundedSender<ToastCommand>,
    snapshots: watch::Receiver<Vec<Toast>>,
    next_id: Arc<AtomicU64>,
}

impl Notifier {
    fn send(&self, command: ToastCommand) {
        if self.commands.send(command).is_err() {
            tracing::warn!("Notification center is gone, dropping toast command");
        }
    }

    fn push(&self, kind: ToastKind, message: impl Into<String>) -> ToastId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.send(ToastCommand::Push(Toast {
            id,
            kind,
            message: message.into(),
        }));
        id
    }

    pub fn loading(&self, message: impl Into<String>) -> ToastId {
        self.push(ToastKind::Loading, message)
    }

    pub fn success(&self, message: impl Into<String>) -> ToastId {
        self.push(ToastKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> ToastId {
        self.push(ToastKind::Error, message)
    }

    pub fn update(&self, id: ToastId, kind: ToastKind, message: impl Into<String>) {
        self.send(ToastCommand::Update {
            id,
            kind,
            message: message.into(),
        });
    }

    pub fn dismiss(&self, id: ToastId) {
        self.send(ToastCommand::Dismiss(Some(id)));
    }

    pub fn dismiss_all(&self) {
        self.send(ToastCommand::Dismiss(None));
    }

    /// The toasts after every command sent so far has been applied.
    ///
    /// Empty if the center has stopped.
    pub async fn current(&self) -> Vec<Toast> {
        let (reply, response) = oneshot::channel();
        self.send(ToastCommand::Snapshot(reply));
        response.await.unwrap_or_default()
    }

    /// Receiver of published snapshots, for renderers.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> {
        self.snapshots.clone()
    }
}
