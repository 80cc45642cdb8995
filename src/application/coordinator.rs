// Navigation coordinator - the only writer of the ViewState
//
// A transition is split in two. `begin_*` commits synchronously under the
// state lock: role check, teardown of the outgoing view, state update,
// observers, hash write, visibility and tab state. The returned
// `PendingTransition` finishes asynchronously: deferred focus, then content
// initialization. Every commit takes a new generation number and a
// pending transition whose generation is no longer current does nothing.
use crate::application::content_manager::ContentManager;
use crate::application::content_registry::ContentRegistry;
use crate::application::document::{Document, DomUpdate, TabGroup, TabTarget};
use crate::application::notifier::{Notification, NotificationKind, Notifier, ViewObserver};
use crate::application::role_gate::RoleGate;
use crate::application::tab_controller::TabController;
use crate::application::url_sync::{Origin, Resolution, UrlSynchronizer};
use crate::domain::catalog::{ElementId, ViewCatalog};
use crate::domain::error::{NavResult, NavigationError};
use crate::domain::view::{AnalyticsPage, DashboardView, ViewState};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct CoordinatorSettings {
    pub settle_delay: Duration,
    pub loading_overlay: bool,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(100),
            loading_overlay: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    Completed,
    /// Navigation committed but a content manager failed to initialize
    InitFailed(String),
    /// A newer transition committed before this one finished
    Superseded,
}

pub struct Collaborators {
    pub document: Arc<dyn Document>,
    pub url: UrlSynchronizer,
    pub tabs: TabController,
    pub content: ContentRegistry,
    pub gate: Arc<dyn RoleGate>,
    pub notifier: Arc<dyn Notifier>,
    pub observers: Vec<Arc<dyn ViewObserver>>,
}

/// Mutable navigation state, created once and handed to one coordinator
#[derive(Debug)]
pub struct NavigationState {
    view_state: ViewState,
    /// Views/pages whose content manager has been initialized and not destroyed
    live_view: Option<DashboardView>,
    live_page: Option<AnalyticsPage>,
    generation: u64,
    shut_down: bool,
}

impl NavigationState {
    pub fn new(initial: ViewState) -> Self {
        Self {
            view_state: initial,
            live_view: None,
            live_page: None,
            generation: 0,
            shut_down: false,
        }
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new(ViewState::default())
    }
}

struct Shared {
    catalog: ViewCatalog,
    parts: Collaborators,
    settings: CoordinatorSettings,
    state: Mutex<NavigationState>,
}

#[derive(Clone)]
pub struct NavigationCoordinator {
    shared: Arc<Shared>,
}

/// The deferred half of a committed transition
#[must_use = "a pending transition does nothing until finished"]
pub struct PendingTransition {
    shared: Arc<Shared>,
    generation: u64,
    target: ViewState,
    page_level: bool,
}

impl NavigationCoordinator {
    pub fn new(state: NavigationState, parts: Collaborators, settings: CoordinatorSettings) -> Self {
        Self {
            shared: Arc::new(Shared {
                catalog: ViewCatalog,
                parts,
                settings,
                state: Mutex::new(state),
            }),
        }
    }

    pub fn state(&self) -> ViewState {
        self.shared.lock().view_state
    }

    pub fn generation(&self) -> u64 {
        self.shared.lock().generation
    }

    pub fn tabs(&self) -> &TabController {
        &self.shared.parts.tabs
    }

    pub fn url(&self) -> &UrlSynchronizer {
        &self.shared.parts.url
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.shared.parts.notifier
    }

    /// Resolve the startup hash and render the resulting state.
    ///
    /// Unrecognized or refused hashes leave the default state in place and
    /// the hash is rewritten to match it.
    pub fn start(&self) -> NavResult<PendingTransition> {
        let current = self.state();
        match self.shared.parts.url.resolve_initial(current) {
            Resolution::Navigate { target, .. } => {
                let page = target.is_analytics().then_some(target.page);
                match self.begin(target.view, page, Origin::Url) {
                    Err(NavigationError::AccessDenied { .. }) => {
                        self.begin(current.view, None, Origin::Url)
                    }
                    other => other,
                }
            }
            Resolution::Current | Resolution::Ignored(_) => {
                self.begin(current.view, None, Origin::Url)
            }
        }
    }

    pub async fn switch_view(&self, view: DashboardView) -> NavResult<TransitionOutcome> {
        Ok(self.begin_view(view, Origin::User)?.finish().await)
    }

    pub async fn switch_analytics_page(&self, page: AnalyticsPage) -> NavResult<TransitionOutcome> {
        Ok(self.begin_page(page, Origin::User)?.finish().await)
    }

    pub fn begin_view(&self, view: DashboardView, origin: Origin) -> NavResult<PendingTransition> {
        self.begin(view, None, origin)
    }

    /// Commit a page change. Outside analytics this enters analytics on
    /// that page.
    pub fn begin_page(&self, page: AnalyticsPage, origin: Origin) -> NavResult<PendingTransition> {
        let shared = &self.shared;
        let mut nav = shared.lock();
        if nav.shut_down {
            return Err(NavigationError::ShutDown);
        }
        if !nav.view_state.is_analytics() {
            drop(nav);
            return self.begin(DashboardView::Analytics, Some(page), origin);
        }
        if !shared.parts.gate.can_access_page(page) {
            return Err(shared.refuse(&nav, page.id(), page.label(), origin));
        }

        let previous = nav.view_state;
        let next = ViewState::new(DashboardView::Analytics, page);
        nav.view_state = next;
        nav.generation += 1;

        shared.notify_observers(&next);
        shared.parts.url.write(&next, origin);

        let mut updates = shared.page_visibility(page);
        if shared.settings.loading_overlay {
            updates.push(DomUpdate::LoadingOverlay(true));
        }
        shared.parts.document.apply(updates);
        shared.parts.tabs.set_active(TabGroup::Analytics, page.id());

        tracing::info!("Analytics page {} -> {}", previous.page, page);
        Ok(PendingTransition {
            shared: Arc::clone(shared),
            generation: nav.generation,
            target: next,
            page_level: true,
        })
    }

    /// Navigate by raw identifier: a view id or an analytics page id
    pub fn navigate_to(&self, id: &str, origin: Origin) -> NavResult<PendingTransition> {
        let catalog = self.shared.catalog;
        if let Some(view) = catalog.view(id) {
            self.begin_view(view, origin)
        } else if let Some(page) = catalog.page(id) {
            self.begin_page(page, origin)
        } else {
            tracing::warn!("Ignoring navigation to unknown target {:?}", id);
            Err(NavigationError::UnknownView(id.to_string()))
        }
    }

    /// Navigate to whatever a clicked tab points at
    pub fn select_tab(&self, target: &TabTarget) -> NavResult<PendingTransition> {
        let catalog = self.shared.catalog;
        match target {
            TabTarget::View(id) => match catalog.view(id) {
                Some(view) => self.begin_view(view, Origin::User),
                None => {
                    tracing::warn!("Tab points at unknown view {:?}", id);
                    Err(NavigationError::UnknownView(id.clone()))
                }
            },
            TabTarget::Page(id) => match catalog.page(id) {
                Some(page) => self.begin_page(page, Origin::User),
                None => {
                    tracing::warn!("Tab points at unknown analytics page {:?}", id);
                    Err(NavigationError::UnknownPage(id.clone()))
                }
            },
        }
    }

    /// React to a `hashchange`.
    ///
    /// The location is read when the event is handled, not when it fired,
    /// so events queued behind our own writes resolve to the current state.
    /// Hashes that resolve to the current state only normalize the URL;
    /// unknown ones restore it.
    pub fn handle_hash_change(&self) -> NavResult<Option<PendingTransition>> {
        let hash = self.shared.parts.url.current_hash();
        let current = {
            let nav = self.shared.lock();
            if nav.shut_down {
                return Err(NavigationError::ShutDown);
            }
            nav.view_state
        };

        match self.shared.parts.url.resolve(&hash, current) {
            Resolution::Current | Resolution::Ignored(_) => {
                self.shared.parts.url.write(&current, Origin::Url);
                Ok(None)
            }
            Resolution::Navigate { target, .. } => {
                if target.is_analytics() && current.is_analytics() {
                    self.begin_page(target.page, Origin::Url).map(Some)
                } else {
                    let page = target.is_analytics().then_some(target.page);
                    self.begin(target.view, page, Origin::Url).map(Some)
                }
            }
        }
    }

    /// Destroy live content, detach tab and hash listeners, and refuse
    /// further transitions. Pending transitions become superseded.
    pub fn shutdown(&self) {
        let shared = &self.shared;
        {
            let mut nav = shared.lock();
            if nav.shut_down {
                return;
            }
            nav.shut_down = true;
            nav.generation += 1;
            if let Some(page) = nav.live_page.take() {
                shared.parts.content.destroy_page(page);
            }
            if let Some(view) = nav.live_view.take() {
                shared.parts.content.destroy_view(view);
            }
        }
        shared.parts.tabs.unbind_all();
        shared.parts.url.stop_listening();
        tracing::info!("Navigation shut down");
    }

    fn begin(
        &self,
        view: DashboardView,
        page: Option<AnalyticsPage>,
        origin: Origin,
    ) -> NavResult<PendingTransition> {
        let shared = &self.shared;
        let gate = &shared.parts.gate;
        let mut nav = shared.lock();
        if nav.shut_down {
            return Err(NavigationError::ShutDown);
        }
        if !gate.can_access_view(view) {
            return Err(shared.refuse(&nav, view.id(), view.label(), origin));
        }

        let page = match page {
            Some(page) if !gate.can_access_page(page) => {
                return Err(shared.refuse(&nav, page.id(), page.label(), origin));
            }
            Some(page) => page,
            None if view == DashboardView::Analytics && !gate.can_access_page(nav.view_state.page) => {
                match AnalyticsPage::ALL.into_iter().find(|p| gate.can_access_page(*p)) {
                    Some(page) => page,
                    None => return Err(shared.refuse(&nav, view.id(), view.label(), origin)),
                }
            }
            None => nav.view_state.page,
        };

        // Outgoing background work stops before anything visible changes
        if let Some(live) = nav.live_view.filter(|live| *live != view) {
            if let Some(live_page) = nav.live_page.take() {
                shared.parts.content.destroy_page(live_page);
            }
            shared.parts.content.destroy_view(live);
            nav.live_view = None;
        }

        let previous = nav.view_state;
        let next = ViewState::new(view, page);
        nav.view_state = next;
        nav.generation += 1;

        shared.notify_observers(&next);
        shared.parts.url.write(&next, origin);
        shared.show_view(&next);

        tracing::info!("Dashboard view {} -> {}", previous.view, view);
        Ok(PendingTransition {
            shared: Arc::clone(shared),
            generation: nav.generation,
            target: next,
            page_level: false,
        })
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, NavigationState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_current(&self, generation: u64) -> bool {
        self.lock().generation == generation
    }

    fn refuse(
        &self,
        nav: &NavigationState,
        target: &str,
        label: &str,
        origin: Origin,
    ) -> NavigationError {
        tracing::warn!("Access to {} refused by role gate", target);
        self.parts.notifier.notify(Notification::new(
            NotificationKind::AccessDenied,
            format!("You do not have access to {}", label),
        ));
        if origin == Origin::Url {
            self.parts.url.write(&nav.view_state, Origin::Url);
        }
        NavigationError::AccessDenied {
            target: target.to_string(),
        }
    }

    fn notify_observers(&self, state: &ViewState) {
        for observer in &self.parts.observers {
            match std::panic::catch_unwind(AssertUnwindSafe(|| observer.view_changed(state))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!("View observer failed: {:#}", e),
                Err(panic) => tracing::warn!("View observer panicked: {}", panic_message(panic)),
            }
        }
    }

    fn show_view(&self, state: &ViewState) {
        let mut updates: Vec<DomUpdate> = self
            .catalog
            .view_containers()
            .into_iter()
            .map(|(view, element)| DomUpdate::Visible {
                element,
                visible: view == state.view,
            })
            .collect();
        if state.is_analytics() {
            updates.extend(self.page_visibility(state.page));
        }
        updates.push(DomUpdate::LoadingOverlay(false));
        self.parts.document.apply(updates);

        self.parts.tabs.set_active(TabGroup::Dashboard, state.view.id());
        if state.is_analytics() {
            self.parts.tabs.set_active(TabGroup::Analytics, state.page.id());
        }
    }

    fn page_visibility(&self, page: AnalyticsPage) -> Vec<DomUpdate> {
        self.catalog
            .page_containers()
            .into_iter()
            .map(|(candidate, element)| DomUpdate::Visible {
                element,
                visible: candidate == page,
            })
            .collect()
    }

    /// Content managers to initialize for `target`, marking them live.
    /// A page that is replaced by another is destroyed first.
    fn plan_init(
        &self,
        nav: &mut NavigationState,
        target: ViewState,
    ) -> Vec<(&'static str, Arc<dyn ContentManager>)> {
        let content = &self.parts.content;
        let mut plan = Vec::new();

        if nav.live_view != Some(target.view) {
            nav.live_view = Some(target.view);
            if let Some(manager) = content.view(target.view) {
                plan.push((target.view.label(), manager));
            }
        }

        if target.is_analytics() && nav.live_page != Some(target.page) {
            if let Some(old) = nav.live_page.replace(target.page) {
                content.destroy_page(old);
            }
            if let Some(manager) = content.page(target.page) {
                plan.push((target.page.label(), manager));
            }
        }

        plan
    }
}

impl PendingTransition {
    pub fn target(&self) -> ViewState {
        self.target
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Focus the new container once layout settles, then initialize its
    /// content. Init failures are reported once and never undo the commit.
    pub async fn finish(self) -> TransitionOutcome {
        let shared = self.shared;
        settle(shared.settings.settle_delay).await;

        let plan = {
            let mut nav = shared.lock();
            if nav.generation != self.generation {
                tracing::debug!("Transition to {:?} superseded before finishing", self.target);
                return TransitionOutcome::Superseded;
            }
            shared.parts.document.focus(&focus_target(&shared.catalog, &self.target, self.page_level));
            shared.plan_init(&mut nav, self.target)
        };

        let mut failures = Vec::new();
        for (name, manager) in plan {
            // A newer commit may have torn this content down already
            if !shared.is_current(self.generation) {
                tracing::debug!("Transition to {:?} superseded during initialization", self.target);
                return TransitionOutcome::Superseded;
            }
            let error = match AssertUnwindSafe(manager.init()).catch_unwind().await {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => format!("{:#}", e),
                Err(panic) => panic_message(panic),
            };
            tracing::error!("Failed to initialize {}: {}", name, error);
            failures.push(format!("{} ({})", name, error));
        }

        let nav = shared.lock();
        if nav.generation != self.generation {
            tracing::debug!("Discarding late initialization result for {:?}", self.target);
            return TransitionOutcome::Superseded;
        }
        if self.page_level {
            shared.parts.document.apply(vec![DomUpdate::LoadingOverlay(false)]);
        }
        drop(nav);

        if failures.is_empty() {
            return TransitionOutcome::Completed;
        }
        let message = format!("Failed to load {}", failures.join(", "));
        shared
            .parts
            .notifier
            .notify(Notification::new(NotificationKind::Error, message.clone()));
        TransitionOutcome::InitFailed(message)
    }
}

fn focus_target(catalog: &ViewCatalog, target: &ViewState, page_level: bool) -> ElementId {
    if page_level {
        catalog.container_for_page(target.page)
    } else {
        catalog.container_for_view(target.view)
    }
}

async fn settle(delay: Duration) {
    if delay.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(delay).await;
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "content manager panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::navigation_history::NavigationHistory;
    use crate::application::role_gate::AllowAll;
    use crate::domain::hash::canonical_hash;
    use crate::infrastructure::content::LoggingContentManager;
    use crate::infrastructure::memory_document::MemoryDocument;
    use crate::infrastructure::memory_history::MemoryHistory;
    use crate::infrastructure::notifier::{BreadcrumbTrail, RecordingNotifier};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    struct Fixture {
        coordinator: NavigationCoordinator,
        document: Arc<MemoryDocument>,
        history: Arc<MemoryHistory>,
        notifier: Arc<RecordingNotifier>,
        breadcrumbs: Arc<BreadcrumbTrail>,
    }

    fn fixture_with(hash: &str, gate: Arc<dyn RoleGate>, content: ContentRegistry) -> Fixture {
        fixture_observed(hash, gate, content, Vec::new())
    }

    fn fixture_observed(
        hash: &str,
        gate: Arc<dyn RoleGate>,
        content: ContentRegistry,
        mut observers: Vec<Arc<dyn ViewObserver>>,
    ) -> Fixture {
        let document = Arc::new(MemoryDocument::dashboard());
        let history = Arc::new(MemoryHistory::new(hash));
        let notifier = Arc::new(RecordingNotifier::new());
        let breadcrumbs = Arc::new(BreadcrumbTrail::default());
        observers.push(breadcrumbs.clone());
        let parts = Collaborators {
            document: document.clone(),
            url: UrlSynchronizer::new(history.clone()),
            tabs: TabController::new(document.clone()),
            content,
            gate,
            notifier: notifier.clone(),
            observers,
        };
        let settings = CoordinatorSettings {
            settle_delay: Duration::ZERO,
            loading_overlay: true,
        };
        Fixture {
            coordinator: NavigationCoordinator::new(NavigationState::default(), parts, settings),
            document,
            history,
            notifier,
            breadcrumbs,
        }
    }

    fn fixture() -> Fixture {
        fixture_with("", Arc::new(AllowAll), ContentRegistry::new())
    }

    struct DenyGovernance;

    impl RoleGate for DenyGovernance {
        fn can_access_view(&self, view: DashboardView) -> bool {
            view != DashboardView::DataGovernance
        }

        fn can_access_page(&self, page: AnalyticsPage) -> bool {
            page != AnalyticsPage::Overview
        }
    }

    struct FailingManager;

    #[async_trait]
    impl ContentManager for FailingManager {
        async fn init(&self) -> anyhow::Result<()> {
            anyhow::bail!("backend unavailable")
        }
    }

    struct PanickingManager;

    #[async_trait]
    impl ContentManager for PanickingManager {
        async fn init(&self) -> anyhow::Result<()> {
            panic!("chart library exploded")
        }
    }

    /// Init stays pending until released
    #[derive(Default)]
    struct GatedManager {
        started: Notify,
        release: Notify,
        inits: AtomicUsize,
        destroys: AtomicUsize,
    }

    #[async_trait]
    impl ContentManager for GatedManager {
        async fn init(&self) -> anyhow::Result<()> {
            self.inits.fetch_add(1, Ordering::SeqCst);
            self.started.notify_one();
            self.release.notified().await;
            anyhow::bail!("late failure")
        }

        fn destroy(&self) {
            self.destroys.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct FailingObserver;

    impl ViewObserver for FailingObserver {
        fn view_changed(&self, _state: &ViewState) -> anyhow::Result<()> {
            anyhow::bail!("breadcrumb widget missing")
        }
    }

    struct PanickingObserver;

    impl ViewObserver for PanickingObserver {
        fn view_changed(&self, _state: &ViewState) -> anyhow::Result<()> {
            panic!("observer exploded")
        }
    }

    fn count(document: &MemoryDocument, group: &[String], name: &str, value: &str) -> usize {
        document
            .elements_with_attribute(name, value)
            .iter()
            .filter(|id| group.contains(id))
            .count()
    }

    fn dashboard_tabs() -> Vec<String> {
        DashboardView::ALL.iter().map(|v| format!("tab-{}", v.id())).collect()
    }

    #[tokio::test]
    async fn test_every_view_writes_its_canonical_hash() {
        let fx = fixture();
        for view in DashboardView::ALL {
            let outcome = fx.coordinator.switch_view(view).await.unwrap();
            assert_eq!(outcome, TransitionOutcome::Completed);
            let expected = match view {
                DashboardView::Maps => String::new(),
                DashboardView::Analytics => "#analytics-overview".to_string(),
                other => format!("#{}", other.id()),
            };
            assert_eq!(fx.history.current_hash(), expected);
            assert_eq!(fx.document.focused(), Some(format!("{}-container", view.id())));
        }
    }

    #[tokio::test]
    async fn test_analytics_scenario_with_browser_back() {
        let fx = fixture();

        fx.coordinator.switch_view(DashboardView::Analytics).await.unwrap();
        assert_eq!(fx.history.current_hash(), "#analytics-overview");
        assert!(fx.document.is_visible("analytics-container"));
        assert!(!fx.document.is_visible("maps-container"));

        fx.coordinator.switch_analytics_page(AnalyticsPage::Users).await.unwrap();
        assert_eq!(fx.history.current_hash(), "#analytics-users");
        assert!(fx.document.is_visible("analytics-users"));
        assert!(!fx.document.is_visible("analytics-overview"));
        assert_eq!(
            fx.document.visible_containers(),
            vec!["analytics-container".to_string(), "analytics-users".to_string()]
        );
        assert_eq!(fx.breadcrumbs.current(), "Analytics › Users");

        assert_eq!(fx.history.back().as_deref(), Some("#analytics-overview"));
        let pending = fx.coordinator.handle_hash_change().unwrap().unwrap();
        assert_eq!(pending.finish().await, TransitionOutcome::Completed);

        assert_eq!(
            fx.coordinator.state(),
            ViewState::new(DashboardView::Analytics, AnalyticsPage::Overview)
        );
        assert_eq!(fx.history.current_hash(), "#analytics-overview");
        assert_eq!(fx.history.len(), 3);
    }

    #[tokio::test]
    async fn test_reentering_current_view_is_idempotent() {
        let server = Arc::new(LoggingContentManager::new("server"));
        let content = ContentRegistry::new().with_view(DashboardView::Server, server.clone());
        let fx = fixture_with("", Arc::new(AllowAll), content);

        fx.coordinator.switch_view(DashboardView::Server).await.unwrap();
        let entries = fx.history.entries();
        let state = fx.coordinator.state();

        fx.coordinator.switch_view(DashboardView::Server).await.unwrap();
        fx.coordinator.switch_view(DashboardView::Server).await.unwrap();

        assert_eq!(fx.history.entries(), entries);
        assert_eq!(fx.coordinator.state(), state);
        assert_eq!(server.init_count(), 1);
        assert_eq!(server.destroy_count(), 0);
        assert_eq!(count(&fx.document, &dashboard_tabs(), "aria-selected", "true"), 1);
    }

    #[tokio::test]
    async fn test_exactly_one_selected_tab_per_group() {
        let fx = fixture();
        let pages: Vec<String> = AnalyticsPage::ALL
            .iter()
            .map(|p| format!("analytics-tab-{}", p.id()))
            .collect();

        let views = [
            DashboardView::Server,
            DashboardView::Analytics,
            DashboardView::Maps,
            DashboardView::Analytics,
        ];
        for view in views {
            fx.coordinator.switch_view(view).await.unwrap();
            for page in [AnalyticsPage::Wrapped, AnalyticsPage::Content] {
                fx.coordinator.switch_analytics_page(page).await.unwrap();
                for group in [&dashboard_tabs(), &pages] {
                    assert_eq!(count(&fx.document, group, "aria-selected", "true"), 1);
                    assert_eq!(count(&fx.document, group, "tabindex", "0"), 1);
                }
            }
        }
        assert_eq!(fx.document.attribute("analytics-tab-content", "tabindex").as_deref(), Some("0"));
    }

    #[tokio::test]
    async fn test_denied_view_changes_nothing() {
        let fx = fixture_with("", Arc::new(DenyGovernance), ContentRegistry::new());
        fx.coordinator.switch_view(DashboardView::Server).await.unwrap();
        let entries = fx.history.entries();

        let result = fx.coordinator.switch_view(DashboardView::DataGovernance).await;

        assert_eq!(
            result,
            Err(NavigationError::AccessDenied {
                target: "data-governance".to_string()
            })
        );
        assert_eq!(fx.coordinator.state().view, DashboardView::Server);
        assert_eq!(fx.history.entries(), entries);
        assert_eq!(fx.notifier.count(NotificationKind::AccessDenied), 1);
        assert!(fx.document.is_visible("server-container"));
    }

    #[tokio::test]
    async fn test_entering_analytics_skips_refused_retained_page() {
        let fx = fixture_with("", Arc::new(DenyGovernance), ContentRegistry::new());
        fx.coordinator.switch_view(DashboardView::Analytics).await.unwrap();
        assert_eq!(fx.coordinator.state().page, AnalyticsPage::Content);
        assert_eq!(fx.history.current_hash(), "#analytics-content");
    }

    #[tokio::test]
    async fn test_init_failure_keeps_navigation_committed() {
        let content = ContentRegistry::new()
            .with_view(DashboardView::Server, Arc::new(FailingManager))
            .with_page(AnalyticsPage::Users, Arc::new(PanickingManager));
        let fx = fixture_with("", Arc::new(AllowAll), content);

        let outcome = fx.coordinator.switch_view(DashboardView::Server).await.unwrap();
        assert!(matches!(outcome, TransitionOutcome::InitFailed(ref m) if m.contains("backend unavailable")));
        assert_eq!(fx.history.current_hash(), "#server");
        assert!(fx.document.is_visible("server-container"));
        assert_eq!(fx.notifier.count(NotificationKind::Error), 1);

        let outcome = fx.coordinator.switch_analytics_page(AnalyticsPage::Users).await.unwrap();
        assert!(matches!(outcome, TransitionOutcome::InitFailed(ref m) if m.contains("chart library exploded")));
        assert_eq!(fx.history.current_hash(), "#analytics-users");
        assert!(!fx.document.loading_overlay_visible());
        assert_eq!(fx.notifier.count(NotificationKind::Error), 2);
        let messages: Vec<String> = fx.notifier.notifications().into_iter().map(|n| n.message).collect();
        assert_eq!(
            messages,
            vec![
                "Failed to load Server (backend unavailable)".to_string(),
                "Failed to load Users (chart library exploded)".to_string(),
            ]
        );

        let outcome = fx.coordinator.switch_view(DashboardView::Maps).await.unwrap();
        assert_eq!(outcome, TransitionOutcome::Completed);
    }

    #[tokio::test]
    async fn test_teardown_runs_before_next_init() {
        let analytics = Arc::new(LoggingContentManager::new("analytics"));
        let overview = Arc::new(LoggingContentManager::new("overview"));
        let users = Arc::new(LoggingContentManager::new("users"));
        let content = ContentRegistry::new()
            .with_view(DashboardView::Analytics, analytics.clone())
            .with_page(AnalyticsPage::Overview, overview.clone())
            .with_page(AnalyticsPage::Users, users.clone());
        let fx = fixture_with("", Arc::new(AllowAll), content);

        fx.coordinator.switch_view(DashboardView::Analytics).await.unwrap();
        assert_eq!((analytics.init_count(), overview.init_count()), (1, 1));

        fx.coordinator.switch_analytics_page(AnalyticsPage::Users).await.unwrap();
        assert_eq!(overview.destroy_count(), 1);
        assert_eq!(users.init_count(), 1);

        // Teardown happens at commit, before the deferred half runs
        let pending = fx.coordinator.begin_view(DashboardView::Maps, Origin::User).unwrap();
        assert_eq!(analytics.destroy_count(), 1);
        assert_eq!(users.destroy_count(), 1);
        pending.finish().await;

        fx.coordinator.switch_view(DashboardView::Analytics).await.unwrap();
        assert_eq!((analytics.init_count(), users.init_count()), (2, 2));
    }

    #[tokio::test]
    async fn test_page_overlay_covers_finalize() {
        let fx = fixture();
        fx.coordinator.switch_view(DashboardView::Analytics).await.unwrap();

        let pending = fx.coordinator.begin_page(AnalyticsPage::Geographic, Origin::User).unwrap();
        assert!(fx.document.loading_overlay_visible());
        assert_eq!(pending.finish().await, TransitionOutcome::Completed);
        assert!(!fx.document.loading_overlay_visible());
        assert_eq!(fx.document.focused().as_deref(), Some("analytics-geographic"));
    }

    #[tokio::test]
    async fn test_page_switch_outside_analytics_enters_analytics() {
        let fx = fixture();
        fx.coordinator.switch_analytics_page(AnalyticsPage::Library).await.unwrap();
        assert_eq!(
            fx.coordinator.state(),
            ViewState::new(DashboardView::Analytics, AnalyticsPage::Library)
        );
        assert_eq!(fx.history.current_hash(), "#analytics-library");
    }

    #[tokio::test]
    async fn test_late_init_of_superseded_transition_is_discarded() {
        let server = Arc::new(GatedManager::default());
        let activity = Arc::new(LoggingContentManager::new("activity"));
        let content = ContentRegistry::new()
            .with_view(DashboardView::Server, server.clone())
            .with_view(DashboardView::Activity, activity.clone());
        let fx = fixture_with("", Arc::new(AllowAll), content);

        let first = fx.coordinator.begin_view(DashboardView::Server, Origin::User).unwrap();
        let handle = tokio::spawn(first.finish());
        server.started.notified().await;

        let outcome = fx.coordinator.switch_view(DashboardView::Activity).await.unwrap();
        assert_eq!(outcome, TransitionOutcome::Completed);
        assert_eq!(server.destroys.load(Ordering::SeqCst), 1);

        server.release.notify_one();
        assert_eq!(handle.await.unwrap(), TransitionOutcome::Superseded);

        assert_eq!(fx.coordinator.state().view, DashboardView::Activity);
        assert_eq!(fx.history.current_hash(), "#activity");
        assert_eq!(fx.notifier.count(NotificationKind::Error), 0);
        assert_eq!(activity.init_count(), 1);
    }

    #[tokio::test]
    async fn test_superseded_transition_never_initializes() {
        let server = Arc::new(LoggingContentManager::new("server"));
        let activity = Arc::new(LoggingContentManager::new("activity"));
        let content = ContentRegistry::new()
            .with_view(DashboardView::Server, server.clone())
            .with_view(DashboardView::Activity, activity.clone());
        let fx = fixture_with("", Arc::new(AllowAll), content);

        let first = fx.coordinator.begin_view(DashboardView::Server, Origin::User).unwrap();
        let second = fx.coordinator.begin_view(DashboardView::Activity, Origin::User).unwrap();
        assert!(second.generation() > first.generation());
        assert_eq!(fx.coordinator.generation(), second.generation());
        assert_eq!(first.target().view, DashboardView::Server);
        assert_eq!(second.target(), fx.coordinator.state());

        assert_eq!(first.finish().await, TransitionOutcome::Superseded);
        assert_eq!(second.finish().await, TransitionOutcome::Completed);
        assert_eq!(server.init_count(), 0);
        assert_eq!(server.destroy_count(), 0);
        assert_eq!(activity.init_count(), 1);
        assert_eq!(fx.document.focused().as_deref(), Some("activity-container"));
    }

    #[tokio::test]
    async fn test_page_not_initialized_after_view_torn_down_mid_init() {
        let analytics = Arc::new(GatedManager::default());
        let overview = Arc::new(LoggingContentManager::new("overview"));
        let content = ContentRegistry::new()
            .with_view(DashboardView::Analytics, analytics.clone())
            .with_page(AnalyticsPage::Overview, overview.clone());
        let fx = fixture_with("", Arc::new(AllowAll), content);

        let first = fx.coordinator.begin_view(DashboardView::Analytics, Origin::User).unwrap();
        let handle = tokio::spawn(first.finish());
        analytics.started.notified().await;

        fx.coordinator.switch_view(DashboardView::Server).await.unwrap();
        assert_eq!(analytics.destroys.load(Ordering::SeqCst), 1);
        assert_eq!(overview.destroy_count(), 1);

        analytics.release.notify_one();
        assert_eq!(handle.await.unwrap(), TransitionOutcome::Superseded);
        assert_eq!(overview.init_count(), 0);
        assert_eq!(fx.coordinator.state().view, DashboardView::Server);
        assert_eq!(fx.notifier.count(NotificationKind::Error), 0);
    }

    #[tokio::test]
    async fn test_failing_observers_do_not_interrupt_transition() {
        let observers: Vec<Arc<dyn ViewObserver>> = vec![Arc::new(FailingObserver), Arc::new(PanickingObserver)];
        let fx = fixture_observed("", Arc::new(AllowAll), ContentRegistry::new(), observers);

        let outcome = fx.coordinator.switch_view(DashboardView::Server).await.unwrap();
        assert_eq!(outcome, TransitionOutcome::Completed);
        assert_eq!(fx.history.current_hash(), "#server");
        assert!(fx.document.is_visible("server-container"));
        assert!(!fx.document.is_visible("maps-container"));
        assert_eq!(fx.breadcrumbs.current(), "Server");

        fx.coordinator.switch_analytics_page(AnalyticsPage::Users).await.unwrap();
        assert_eq!(fx.history.current_hash(), "#analytics-users");
        assert_eq!(
            fx.document.visible_containers(),
            vec!["analytics-container".to_string(), "analytics-users".to_string()]
        );
    }

    #[tokio::test]
    async fn test_unknown_hashes_keep_state_and_restore_url() {
        let fx = fixture();
        fx.coordinator.switch_view(DashboardView::Server).await.unwrap();

        fx.history.navigate("#bogus");
        assert!(fx.coordinator.handle_hash_change().unwrap().is_none());
        assert_eq!(fx.coordinator.state().view, DashboardView::Server);
        assert_eq!(fx.history.current_hash(), "#server");

        fx.history.navigate("#analytics-bogus");
        let pending = fx.coordinator.handle_hash_change().unwrap().unwrap();
        pending.finish().await;
        assert_eq!(
            fx.coordinator.state(),
            ViewState::new(DashboardView::Analytics, AnalyticsPage::Overview)
        );
        assert_eq!(fx.history.current_hash(), "#analytics-overview");
    }

    #[tokio::test]
    async fn test_start_round_trips_every_canonical_hash() {
        for view in DashboardView::ALL {
            for page in [AnalyticsPage::Overview, AnalyticsPage::Performance, AnalyticsPage::Wrapped] {
                let expected = if view == DashboardView::Analytics {
                    ViewState::new(view, page)
                } else {
                    ViewState::new(view, AnalyticsPage::Overview)
                };
                let hash = canonical_hash(&expected);
                let fx = fixture_with(&hash, Arc::new(AllowAll), ContentRegistry::new());

                fx.coordinator.start().unwrap().finish().await;

                assert_eq!(fx.coordinator.state(), expected);
                assert_eq!(fx.history.entries(), vec![hash]);
            }
        }
    }

    #[tokio::test]
    async fn test_start_with_refused_hash_falls_back_to_default() {
        let fx = fixture_with("#data-governance", Arc::new(DenyGovernance), ContentRegistry::new());
        fx.coordinator.start().unwrap().finish().await;
        assert_eq!(fx.coordinator.state(), ViewState::default());
        assert_eq!(fx.history.current_hash(), "");
        assert_eq!(fx.notifier.count(NotificationKind::AccessDenied), 1);
        assert!(fx.document.is_visible("maps-container"));
    }

    #[tokio::test]
    async fn test_navigate_by_id_and_tab_target() {
        let fx = fixture();
        fx.coordinator.navigate_to("newsletter", Origin::User).unwrap().finish().await;
        assert_eq!(fx.coordinator.state().view, DashboardView::Newsletter);

        fx.coordinator.navigate_to("tautulli", Origin::User).unwrap().finish().await;
        assert_eq!(fx.coordinator.state().page, AnalyticsPage::Tautulli);

        assert!(matches!(
            fx.coordinator.navigate_to("nope", Origin::User),
            Err(NavigationError::UnknownView(_))
        ));
        assert!(matches!(
            fx.coordinator.select_tab(&TabTarget::Page("nope".into())),
            Err(NavigationError::UnknownPage(_))
        ));
        assert_eq!(fx.coordinator.state().page, AnalyticsPage::Tautulli);
    }

    #[tokio::test]
    async fn test_shutdown_destroys_live_content_and_refuses_transitions() {
        let maps = Arc::new(LoggingContentManager::new("maps"));
        let content = ContentRegistry::new().with_view(DashboardView::Maps, maps.clone());
        let fx = fixture_with("", Arc::new(AllowAll), content);
        fx.coordinator.start().unwrap().finish().await;
        fx.coordinator.tabs().bind_tabs(Arc::new(|_: TabTarget| {}));

        let pending = fx.coordinator.begin_view(DashboardView::Maps, Origin::User).unwrap();
        fx.coordinator.shutdown();
        fx.coordinator.shutdown();

        assert_eq!(maps.destroy_count(), 1);
        assert_eq!(fx.document.listener_count("tab-maps"), 0);
        assert_eq!(pending.finish().await, TransitionOutcome::Superseded);
        assert!(matches!(
            fx.coordinator.switch_view(DashboardView::Server).await,
            Err(NavigationError::ShutDown)
        ));
    }
}
