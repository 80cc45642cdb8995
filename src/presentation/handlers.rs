// UI event handlers - sequential dispatch of tab, key and hash events
use crate::application::coordinator::{PendingTransition, TransitionOutcome};
use crate::application::document::TabTarget;
use crate::application::notifier::{Notification, NotificationKind};
use crate::application::url_sync::Origin;
use crate::domain::keyboard::{KeyCommand, KeyPress};
use crate::domain::view::{AnalyticsPage, DashboardView, ViewState};
use crate::presentation::app_state::AppState;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;

#[derive(Debug)]
pub enum NavEvent {
    TabSelected(TabTarget),
    KeyDown(KeyPress),
    HashChanged(String),
    /// Programmatic navigation by view or page id
    Navigate(String),
    /// Reply once every in-flight transition has finished
    Settle(oneshot::Sender<ViewState>),
    Shutdown,
}

#[derive(Debug, Serialize)]
pub struct StateSnapshot {
    pub view: DashboardView,
    pub page: AnalyticsPage,
    pub hash: String,
    pub breadcrumb: String,
}

impl StateSnapshot {
    pub fn capture(state: &AppState) -> Self {
        let current = state.coordinator.state();
        Self {
            view: current.view,
            page: current.page,
            hash: state.coordinator.url().current_hash(),
            breadcrumb: state.breadcrumbs.current(),
        }
    }
}

/// Result of a key press: the transition it started (if any) and whether
/// the browser default action must be suppressed
pub struct KeyResponse {
    pub transition: Option<PendingTransition>,
    pub prevent_default: bool,
}

pub fn handle_key_down(state: &AppState, press: &KeyPress) -> KeyResponse {
    let current = state.coordinator.state();
    let Some(decision) = state.keyboard.route(press, current.view, current.page) else {
        return KeyResponse {
            transition: None,
            prevent_default: false,
        };
    };

    let transition = match decision.command {
        KeyCommand::GoToPage(page) => state
            .coordinator
            .begin_page(page, Origin::User)
            .map_err(|e| tracing::warn!("Keyboard navigation to {} refused: {}", page, e))
            .ok(),
        KeyCommand::ShowHelp => {
            state.coordinator.notifier().notify(Notification::new(
                NotificationKind::Info,
                state.keyboard.help_summary(),
            ));
            None
        }
    };

    KeyResponse {
        transition,
        prevent_default: decision.prevent_default,
    }
}

/// Commit the transition an event asks for. Errors are logged here and
/// never escape.
pub fn dispatch(state: &AppState, event: NavEvent) -> Option<PendingTransition> {
    let coordinator = &state.coordinator;
    let result = match event {
        NavEvent::TabSelected(target) => coordinator.select_tab(&target).map(Some),
        NavEvent::HashChanged(hash) => {
            tracing::debug!("hashchange to {:?}", hash);
            coordinator.handle_hash_change()
        }
        NavEvent::Navigate(id) => coordinator.navigate_to(&id, Origin::User).map(Some),
        NavEvent::KeyDown(press) => {
            let response = handle_key_down(state, &press);
            if response.prevent_default {
                tracing::debug!("Suppressed default action for key {:?}", press.key);
            }
            Ok(response.transition)
        }
        NavEvent::Settle(_) | NavEvent::Shutdown => Ok(None),
    };

    match result {
        Ok(pending) => pending,
        Err(e) => {
            tracing::warn!("Navigation request ignored: {}", e);
            None
        }
    }
}

/// Process events in arrival order. Commits happen here, one at a time;
/// the deferred half of each transition runs on its own task so a slow
/// content manager never blocks newer navigation.
pub async fn run_event_loop(state: Arc<AppState>, mut rx: mpsc::UnboundedReceiver<NavEvent>) {
    let mut in_flight: JoinSet<TransitionOutcome> = JoinSet::new();

    while let Some(event) = rx.recv().await {
        match event {
            NavEvent::Shutdown => {
                state.coordinator.shutdown();
                break;
            }
            NavEvent::Settle(reply) => {
                drain(&mut in_flight).await;
                let _ = reply.send(state.coordinator.state());
            }
            event => {
                if let Some(pending) = dispatch(&state, event) {
                    in_flight.spawn(pending.finish());
                }
            }
        }

        while let Some(finished) = in_flight.try_join_next() {
            log_outcome(finished);
        }
    }

    drain(&mut in_flight).await;
    tracing::debug!("Navigation event loop stopped");
}

async fn drain(in_flight: &mut JoinSet<TransitionOutcome>) {
    while let Some(finished) = in_flight.join_next().await {
        log_outcome(finished);
    }
}

fn log_outcome(finished: Result<TransitionOutcome, tokio::task::JoinError>) {
    match finished {
        Ok(TransitionOutcome::Completed) => {}
        Ok(TransitionOutcome::Superseded) => tracing::debug!("Transition superseded"),
        Ok(TransitionOutcome::InitFailed(message)) => tracing::debug!("Transition finished with: {}", message),
        Err(e) => tracing::error!("Transition task failed: {}", e),
    }
}
