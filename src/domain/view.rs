// View domain model - dashboard views, analytics pages and the current pair
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DashboardView {
    Maps,
    Activity,
    Analytics,
    RecentlyAdded,
    Server,
    CrossPlatform,
    DataGovernance,
    Newsletter,
}

impl DashboardView {
    /// Catalog order
    pub const ALL: [DashboardView; 8] = [
        DashboardView::Maps,
        DashboardView::Activity,
        DashboardView::Analytics,
        DashboardView::RecentlyAdded,
        DashboardView::Server,
        DashboardView::CrossPlatform,
        DashboardView::DataGovernance,
        DashboardView::Newsletter,
    ];

    pub const DEFAULT: DashboardView = DashboardView::Maps;

    pub fn id(self) -> &'static str {
        match self {
            DashboardView::Maps => "maps",
            DashboardView::Activity => "activity",
            DashboardView::Analytics => "analytics",
            DashboardView::RecentlyAdded => "recently-added",
            DashboardView::Server => "server",
            DashboardView::CrossPlatform => "cross-platform",
            DashboardView::DataGovernance => "data-governance",
            DashboardView::Newsletter => "newsletter",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DashboardView::Maps => "Maps",
            DashboardView::Activity => "Live Activity",
            DashboardView::Analytics => "Analytics",
            DashboardView::RecentlyAdded => "Recently Added",
            DashboardView::Server => "Server",
            DashboardView::CrossPlatform => "Cross-Platform",
            DashboardView::DataGovernance => "Data Governance",
            DashboardView::Newsletter => "Newsletter",
        }
    }
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for DashboardView {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DashboardView::ALL
            .into_iter()
            .find(|view| view.id() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalyticsPage {
    Overview,
    Content,
    Users,
    Performance,
    Geographic,
    Advanced,
    Library,
    UsersProfile,
    Tautulli,
    Wrapped,
}

impl AnalyticsPage {
    /// Catalog order, which is also the keyboard order
    pub const ALL: [AnalyticsPage; 10] = [
        AnalyticsPage::Overview,
        AnalyticsPage::Content,
        AnalyticsPage::Users,
        AnalyticsPage::Performance,
        AnalyticsPage::Geographic,
        AnalyticsPage::Advanced,
        AnalyticsPage::Library,
        AnalyticsPage::UsersProfile,
        AnalyticsPage::Tautulli,
        AnalyticsPage::Wrapped,
    ];

    pub const DEFAULT: AnalyticsPage = AnalyticsPage::Overview;

    pub fn id(self) -> &'static str {
        match self {
            AnalyticsPage::Overview => "overview",
            AnalyticsPage::Content => "content",
            AnalyticsPage::Users => "users",
            AnalyticsPage::Performance => "performance",
            AnalyticsPage::Geographic => "geographic",
            AnalyticsPage::Advanced => "advanced",
            AnalyticsPage::Library => "library",
            AnalyticsPage::UsersProfile => "users-profile",
            AnalyticsPage::Tautulli => "tautulli",
            AnalyticsPage::Wrapped => "wrapped",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AnalyticsPage::Overview => "Overview",
            AnalyticsPage::Content => "Content",
            AnalyticsPage::Users => "Users",
            AnalyticsPage::Performance => "Performance",
            AnalyticsPage::Geographic => "Geographic",
            AnalyticsPage::Advanced => "Advanced",
            AnalyticsPage::Library => "Library",
            AnalyticsPage::UsersProfile => "User Profile",
            AnalyticsPage::Tautulli => "Tautulli",
            AnalyticsPage::Wrapped => "Wrapped",
        }
    }

    pub fn index(self) -> usize {
        AnalyticsPage::ALL
            .iter()
            .position(|page| *page == self)
            .unwrap_or(0)
    }

    /// Page at a zero-based catalog position
    pub fn at(index: usize) -> Option<AnalyticsPage> {
        AnalyticsPage::ALL.get(index).copied()
    }

    pub fn next(self) -> AnalyticsPage {
        let len = AnalyticsPage::ALL.len();
        AnalyticsPage::ALL[(self.index() + 1) % len]
    }

    pub fn previous(self) -> AnalyticsPage {
        let len = AnalyticsPage::ALL.len();
        AnalyticsPage::ALL[(self.index() + len - 1) % len]
    }
}

impl fmt::Display for AnalyticsPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for AnalyticsPage {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnalyticsPage::ALL
            .into_iter()
            .find(|page| page.id() == s)
            .ok_or(())
    }
}

/// The single source of truth for where the user is.
///
/// The analytics page is retained while another view is active so that
/// returning to analytics resumes the last sub-page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub view: DashboardView,
    pub page: AnalyticsPage,
}

impl ViewState {
    pub fn new(view: DashboardView, page: AnalyticsPage) -> Self {
        Self { view, page }
    }

    pub fn is_analytics(&self) -> bool {
        self.view == DashboardView::Analytics
    }

    /// Human-readable trail, e.g. "Analytics › Users"
    pub fn breadcrumb(&self) -> String {
        if self.is_analytics() {
            format!("{} › {}", self.view.label(), self.page.label())
        } else {
            self.view.label().to_string()
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DashboardView::DEFAULT, AnalyticsPage::DEFAULT)
    }
}
