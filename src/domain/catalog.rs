// View catalog - fixed mapping between view identifiers and container elements
use super::view::{AnalyticsPage, DashboardView};

/// Identifier of an element in the document
pub type ElementId = String;

/// Stateless lookups over the closed view and page sets.
///
/// Unknown identifiers answer `false` / `None`; callers treat that as
/// "keep the current state".
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewCatalog;

impl ViewCatalog {
    pub fn is_valid_view(&self, id: &str) -> bool {
        id.parse::<DashboardView>().is_ok()
    }

    pub fn is_valid_page(&self, id: &str) -> bool {
        id.parse::<AnalyticsPage>().is_ok()
    }

    pub fn view(&self, id: &str) -> Option<DashboardView> {
        id.parse().ok()
    }

    pub fn page(&self, id: &str) -> Option<AnalyticsPage> {
        id.parse().ok()
    }

    pub fn container_for_view(&self, view: DashboardView) -> ElementId {
        format!("{}-container", view.id())
    }

    pub fn container_for_page(&self, page: AnalyticsPage) -> ElementId {
        format!("analytics-{}", page.id())
    }

    pub fn view_for_container(&self, container: &str) -> Option<DashboardView> {
        container
            .strip_suffix("-container")
            .and_then(|id| self.view(id))
    }

    pub fn page_for_container(&self, container: &str) -> Option<AnalyticsPage> {
        container
            .strip_prefix("analytics-")
            .and_then(|id| self.page(id))
    }

    pub fn view_containers(&self) -> Vec<(DashboardView, ElementId)> {
        DashboardView::ALL
            .into_iter()
            .map(|view| (view, self.container_for_view(view)))
            .collect()
    }

    pub fn page_containers(&self) -> Vec<(AnalyticsPage, ElementId)> {
        AnalyticsPage::ALL
            .into_iter()
            .map(|page| (page, self.container_for_page(page)))
            .collect()
    }
}
