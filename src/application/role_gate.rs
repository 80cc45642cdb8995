// Role gate - capability predicate consulted before every transition
use crate::domain::view::{AnalyticsPage, DashboardView};

pub trait RoleGate: Send + Sync {
    fn can_access_view(&self, view: DashboardView) -> bool;

    fn can_access_page(&self, page: AnalyticsPage) -> bool;
}

/// Gate that lets everything through
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl RoleGate for AllowAll {
    fn can_access_view(&self, _view: DashboardView) -> bool {
        true
    }

    fn can_access_page(&self, _page: AnalyticsPage) -> bool {
        true
    }
}
