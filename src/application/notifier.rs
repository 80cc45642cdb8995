// User-facing notifications and view observers
use crate::domain::view::ViewState;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    AccessDenied,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }
}

/// Toast presentation
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Fire-and-forget listener for committed view changes (breadcrumbs etc.).
/// Errors are logged and never abort a transition.
pub trait ViewObserver: Send + Sync {
    fn view_changed(&self, state: &ViewState) -> anyhow::Result<()>;
}
