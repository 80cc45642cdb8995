// Role gate backed by per-role deny lists from configuration
use crate::application::role_gate::RoleGate;
use crate::domain::catalog::ViewCatalog;
use crate::domain::view::{AnalyticsPage, DashboardView};
use crate::infrastructure::config::AccessSettings;
use std::collections::HashSet;

const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone)]
pub struct PolicyRoleGate {
    role: String,
    denied_views: HashSet<DashboardView>,
    denied_pages: HashSet<AnalyticsPage>,
    /// Unknown roles see only the default view
    restricted: bool,
}

impl PolicyRoleGate {
    pub fn from_settings(settings: &AccessSettings) -> Self {
        let catalog = ViewCatalog;
        let role = settings.role.clone();

        let Some(policy) = settings.policies.get(&role) else {
            let restricted = role != ADMIN_ROLE;
            if restricted {
                tracing::warn!("No access policy for role {:?}; only the default view is reachable", role);
            }
            return Self {
                role,
                denied_views: HashSet::new(),
                denied_pages: HashSet::new(),
                restricted,
            };
        };

        let denied_views = policy
            .denied_views
            .iter()
            .filter_map(|id| {
                let view = catalog.view(id);
                if view.is_none() {
                    tracing::warn!("Access policy for {:?} names unknown view {:?}", role, id);
                }
                view
            })
            .filter(|view| *view != DashboardView::DEFAULT)
            .collect();

        let denied_pages = policy
            .denied_pages
            .iter()
            .filter_map(|id| {
                let page = catalog.page(id);
                if page.is_none() {
                    tracing::warn!("Access policy for {:?} names unknown page {:?}", role, id);
                }
                page
            })
            .collect();

        Self {
            role,
            denied_views,
            denied_pages,
            restricted: false,
        }
    }

    pub fn role(&self) -> &str {
        &self.role
    }
}

impl RoleGate for PolicyRoleGate {
    fn can_access_view(&self, view: DashboardView) -> bool {
        if self.restricted {
            return view == DashboardView::DEFAULT;
        }
        !self.denied_views.contains(&view)
    }

    fn can_access_page(&self, page: AnalyticsPage) -> bool {
        !self.restricted && !self.denied_pages.contains(&page)
    }
}
