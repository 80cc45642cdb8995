// Notification sinks and breadcrumb observer
use crate::application::notifier::{Notification, NotificationKind, Notifier, ViewObserver};
use crate::domain::view::ViewState;
use std::sync::Mutex;

/// Writes notifications to the log instead of showing toasts
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Info => tracing::info!("[notice] {}", notification.message),
            NotificationKind::AccessDenied => {
                tracing::warn!("[access denied] {}", notification.message)
            }
            NotificationKind::Error => tracing::error!("[error] {}", notification.message),
        }
    }
}

/// Keeps every notification; also forwards to the log
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    pub fn count(&self, kind: NotificationKind) -> usize {
        self.lock().iter().filter(|n| n.kind == kind).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        self.seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        LogNotifier.notify(notification.clone());
        self.lock().push(notification);
    }
}

/// Tracks the breadcrumb trail of the current location
#[derive(Debug, Default)]
pub struct BreadcrumbTrail {
    current: Mutex<String>,
}

impl BreadcrumbTrail {
    pub fn current(&self) -> String {
        self.current
            .lock()
            .map(|current| current.clone())
            .unwrap_or_default()
    }
}

impl ViewObserver for BreadcrumbTrail {
    fn view_changed(&self, state: &ViewState) -> anyhow::Result<()> {
        let mut current = self
            .current
            .lock()
            .map_err(|_| anyhow::anyhow!("breadcrumb state poisoned"))?;
        *current = state.breadcrumb();
        tracing::debug!("Breadcrumb: {}", current);
        Ok(())
    }
}
