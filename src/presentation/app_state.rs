// Application state - wires collaborators into the coordinator and event channel
use crate::application::content_registry::ContentRegistry;
use crate::application::coordinator::{
    Collaborators, CoordinatorSettings, NavigationCoordinator, NavigationState,
};
use crate::application::document::{Document, TabTarget};
use crate::application::navigation_history::NavigationHistory;
use crate::application::notifier::{Notifier, ViewObserver};
use crate::application::role_gate::RoleGate;
use crate::application::tab_controller::TabController;
use crate::application::url_sync::UrlSynchronizer;
use crate::domain::keyboard::KeyboardRouter;
use crate::domain::view::ViewState;
use crate::infrastructure::config::NavigationConfig;
use crate::infrastructure::notifier::BreadcrumbTrail;
use crate::infrastructure::role_policy::PolicyRoleGate;
use crate::presentation::handlers::NavEvent;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Browser-side collaborators supplied by the host
pub struct HostParts {
    pub document: Arc<dyn Document>,
    pub history: Arc<dyn NavigationHistory>,
    pub content: ContentRegistry,
    pub notifier: Arc<dyn Notifier>,
}

pub struct AppState {
    pub coordinator: NavigationCoordinator,
    pub keyboard: KeyboardRouter,
    pub breadcrumbs: Arc<BreadcrumbTrail>,
    pub events: mpsc::UnboundedSender<NavEvent>,
}

impl AppState {
    /// Build the navigation layer with the role gate described by `config`
    pub fn build(
        config: &NavigationConfig,
        host: HostParts,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<NavEvent>) {
        let gate = Arc::new(PolicyRoleGate::from_settings(&config.access));
        tracing::info!("Navigation role: {}", gate.role());
        Self::build_with_gate(config, host, gate)
    }

    pub fn build_with_gate(
        config: &NavigationConfig,
        host: HostParts,
        gate: Arc<dyn RoleGate>,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<NavEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let breadcrumbs = Arc::new(BreadcrumbTrail::default());

        let tabs = TabController::new(host.document.clone());
        let url = UrlSynchronizer::new(host.history);
        let observers: Vec<Arc<dyn ViewObserver>> = vec![breadcrumbs.clone()];

        let parts = Collaborators {
            document: host.document,
            url,
            tabs,
            content: host.content,
            gate,
            notifier: host.notifier,
            observers,
        };
        let settings = CoordinatorSettings {
            settle_delay: config.navigation.settle_delay(),
            loading_overlay: config.navigation.loading_overlay,
        };
        let coordinator =
            NavigationCoordinator::new(NavigationState::new(ViewState::default()), parts, settings);

        let state = Arc::new(Self {
            coordinator,
            keyboard: KeyboardRouter::new(config.navigation.keyboard_shortcuts),
            breadcrumbs,
            events,
        });
        state.connect();
        (state, rx)
    }

    /// Route tab clicks and `hashchange` into the event channel
    fn connect(&self) {
        let tx = self.events.clone();
        let bound = self.coordinator.tabs().bind_tabs(Arc::new(move |target: TabTarget| {
            if tx.send(NavEvent::TabSelected(target)).is_err() {
                tracing::debug!("Tab click after event loop stopped");
            }
        }));
        tracing::debug!("Connected {} tabs", bound);

        let tx = self.events.clone();
        self.coordinator.url().listen(Arc::new(move |hash: &str| {
            if tx.send(NavEvent::HashChanged(hash.to_string())).is_err() {
                tracing::debug!("hashchange after event loop stopped");
            }
        }));
    }

    /// Re-bind tabs after the host re-rendered its tab strip
    pub fn tabs_rerendered(&self) -> usize {
        self.coordinator.tabs().rebind()
    }
}
