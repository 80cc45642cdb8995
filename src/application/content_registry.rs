// Content registry - content managers keyed by view and analytics page
use crate::application::content_manager::ContentManager;
use crate::domain::view::{AnalyticsPage, DashboardView};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct ContentRegistry {
    views: HashMap<DashboardView, Arc<dyn ContentManager>>,
    pages: HashMap<AnalyticsPage, Arc<dyn ContentManager>>,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_view(mut self, view: DashboardView, manager: Arc<dyn ContentManager>) -> Self {
        self.views.insert(view, manager);
        self
    }

    pub fn with_page(mut self, page: AnalyticsPage, manager: Arc<dyn ContentManager>) -> Self {
        self.pages.insert(page, manager);
        self
    }

    pub fn view(&self, view: DashboardView) -> Option<Arc<dyn ContentManager>> {
        self.views.get(&view).cloned()
    }

    pub fn page(&self, page: AnalyticsPage) -> Option<Arc<dyn ContentManager>> {
        self.pages.get(&page).cloned()
    }

    pub fn destroy_view(&self, view: DashboardView) {
        if let Some(manager) = self.views.get(&view) {
            tracing::debug!("Destroying content for view {}", view);
            manager.destroy();
        }
    }

    pub fn destroy_page(&self, page: AnalyticsPage) {
        if let Some(manager) = self.pages.get(&page) {
            tracing::debug!("Destroying content for analytics page {}", page);
            manager.destroy();
        }
    }
}
