// URL hash grammar - canonical encoding of a ViewState and its inverse
use super::view::{AnalyticsPage, DashboardView, ViewState};

const ANALYTICS_PREFIX: &str = "analytics-";

/// Result of reading a location hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashRoute {
    /// No hash at all: stay on the default state
    Empty,
    /// A top-level view; for `analytics` the retained page applies
    View(DashboardView),
    /// `analytics-<page>`; `healed` is set when `<page>` was unknown and
    /// the route fell back to the default page
    Analytics { page: AnalyticsPage, healed: bool },
    /// Anything else
    Unrecognized(String),
}

/// Encode a state as the one hash string the synchronizer writes.
///
/// The default view encodes as the empty string.
pub fn canonical_hash(state: &ViewState) -> String {
    match state.view {
        DashboardView::Maps => String::new(),
        DashboardView::Analytics => format!("#{}{}", ANALYTICS_PREFIX, state.page.id()),
        view => format!("#{}", view.id()),
    }
}

pub fn parse_hash(hash: &str) -> HashRoute {
    let raw = hash.strip_prefix('#').unwrap_or(hash);
    if raw.is_empty() {
        return HashRoute::Empty;
    }

    let decoded = match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => return HashRoute::Unrecognized(raw.to_string()),
    };
    let segment = decoded.trim();

    if let Some(page_id) = segment.strip_prefix(ANALYTICS_PREFIX) {
        return match page_id.parse::<AnalyticsPage>() {
            Ok(page) => HashRoute::Analytics { page, healed: false },
            Err(()) => HashRoute::Analytics {
                page: AnalyticsPage::DEFAULT,
                healed: true,
            },
        };
    }

    match segment.parse::<DashboardView>() {
        Ok(view) => HashRoute::View(view),
        Err(()) => HashRoute::Unrecognized(segment.to_string()),
    }
}

impl HashRoute {
    /// Apply the route on top of `current`, or `None` when the hash names
    /// nothing the catalog knows.
    pub fn resolve(&self, current: ViewState) -> Option<ViewState> {
        match self {
            HashRoute::Empty => Some(ViewState::new(DashboardView::DEFAULT, current.page)),
            HashRoute::View(view) => Some(ViewState::new(*view, current.page)),
            HashRoute::Analytics { page, .. } => {
                Some(ViewState::new(DashboardView::Analytics, *page))
            }
            HashRoute::Unrecognized(_) => None,
        }
    }
}
