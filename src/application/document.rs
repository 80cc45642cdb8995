// Document abstraction - the slice of the DOM the navigation layer touches
use crate::domain::catalog::ElementId;
use std::sync::Arc;

pub type ListenerId = u64;

/// Click callback; receives the id of the clicked element
pub type ClickHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Raw navigation target read from a tab's data attribute.
///
/// Values come straight from the markup and are validated against the
/// catalog only when selected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TabTarget {
    /// `data-view`
    View(String),
    /// `data-analytics-page`
    Page(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabGroup {
    Dashboard,
    Analytics,
}

impl TabTarget {
    pub fn group(&self) -> TabGroup {
        match self {
            TabTarget::View(_) => TabGroup::Dashboard,
            TabTarget::Page(_) => TabGroup::Analytics,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            TabTarget::View(id) | TabTarget::Page(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabElement {
    pub element: ElementId,
    pub target: TabTarget,
}

/// A single visual mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomUpdate {
    Class {
        element: ElementId,
        class: &'static str,
        enabled: bool,
    },
    Attribute {
        element: ElementId,
        name: &'static str,
        value: String,
    },
    Visible {
        element: ElementId,
        visible: bool,
    },
    LoadingOverlay(bool),
}

pub trait Document: Send + Sync {
    /// Elements carrying `data-view` or `data-analytics-page`, in document order
    fn tabs(&self) -> Vec<TabElement>;

    /// `None` when the element is not in the document
    fn add_click_listener(&self, element: &str, handler: ClickHandler) -> Option<ListenerId>;

    fn remove_click_listener(&self, element: &str, listener: ListenerId);

    /// Apply every update as one unit; no observer may see a partial batch
    fn apply(&self, updates: Vec<DomUpdate>);

    fn focus(&self, element: &str);
}
