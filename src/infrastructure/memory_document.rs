// In-memory document - element attributes, visibility, focus and click listeners
use crate::application::document::{
    ClickHandler, Document, DomUpdate, ListenerId, TabElement, TabTarget,
};
use crate::domain::catalog::{ElementId, ViewCatalog};
use crate::domain::view::{AnalyticsPage, DashboardView};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

const DATA_VIEW: &str = "data-view";
const DATA_PAGE: &str = "data-analytics-page";

#[derive(Default)]
struct Element {
    attributes: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    visible: bool,
    listeners: Vec<(ListenerId, ClickHandler)>,
}

#[derive(Default)]
struct Tree {
    elements: BTreeMap<ElementId, Element>,
    /// Document order
    order: Vec<ElementId>,
    focused: Option<ElementId>,
    loading_overlay: bool,
    next_listener: ListenerId,
}

#[derive(Default)]
pub struct MemoryDocument {
    tree: Mutex<Tree>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tabs and containers for every catalogued view and page
    pub fn dashboard() -> Self {
        let catalog = ViewCatalog;
        let document = Self::new();
        for view in DashboardView::ALL {
            document.add_tab(&format!("tab-{}", view.id()), TabTarget::View(view.id().to_string()));
        }
        for page in AnalyticsPage::ALL {
            document.add_tab(
                &format!("analytics-tab-{}", page.id()),
                TabTarget::Page(page.id().to_string()),
            );
        }
        for (view, container) in catalog.view_containers() {
            document.add_element(&container, view == DashboardView::DEFAULT);
        }
        for (page, container) in catalog.page_containers() {
            document.add_element(&container, page == AnalyticsPage::DEFAULT);
        }
        document
    }

    pub fn add_element(&self, id: &str, visible: bool) {
        let mut tree = self.lock();
        if !tree.elements.contains_key(id) {
            tree.order.push(id.to_string());
        }
        tree.elements.insert(
            id.to_string(),
            Element {
                visible,
                ..Element::default()
            },
        );
    }

    pub fn add_tab(&self, id: &str, target: TabTarget) {
        self.add_element(id, true);
        let (name, value) = match target {
            TabTarget::View(value) => (DATA_VIEW, value),
            TabTarget::Page(value) => (DATA_PAGE, value),
        };
        if let Some(element) = self.lock().elements.get_mut(id) {
            element.attributes.insert(name.to_string(), value);
        }
    }

    pub fn remove_element(&self, id: &str) {
        let mut tree = self.lock();
        tree.elements.remove(id);
        tree.order.retain(|element| element != id);
        if tree.focused.as_deref() == Some(id) {
            tree.focused = None;
        }
    }

    /// Dispatch a click; returns how many listeners ran
    pub fn click(&self, id: &str) -> usize {
        let handlers: Vec<ClickHandler> = match self.lock().elements.get(id) {
            Some(element) => element.listeners.iter().map(|(_, h)| h.clone()).collect(),
            None => return 0,
        };
        for handler in &handlers {
            handler(id);
        }
        handlers.len()
    }

    pub fn listener_count(&self, id: &str) -> usize {
        self.lock()
            .elements
            .get(id)
            .map(|element| element.listeners.len())
            .unwrap_or(0)
    }

    pub fn attribute(&self, id: &str, name: &str) -> Option<String> {
        self.lock()
            .elements
            .get(id)
            .and_then(|element| element.attributes.get(name).cloned())
    }

    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.lock()
            .elements
            .get(id)
            .map(|element| element.classes.contains(class))
            .unwrap_or(false)
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.lock()
            .elements
            .get(id)
            .map(|element| element.visible)
            .unwrap_or(false)
    }

    /// Sorted ids of elements whose attribute `name` equals `value`
    pub fn elements_with_attribute(&self, name: &str, value: &str) -> Vec<ElementId> {
        self.lock()
            .elements
            .iter()
            .filter(|(_, element)| element.attributes.get(name).map(String::as_str) == Some(value))
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Sorted ids of visible catalogued containers
    pub fn visible_containers(&self) -> Vec<ElementId> {
        let catalog = ViewCatalog;
        self.lock()
            .elements
            .iter()
            .filter(|(id, element)| {
                element.visible
                    && (catalog.view_for_container(id).is_some()
                        || catalog.page_for_container(id).is_some())
            })
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.lock().focused.clone()
    }

    pub fn loading_overlay_visible(&self) -> bool {
        self.lock().loading_overlay
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tree> {
        self.tree.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Document for MemoryDocument {
    fn tabs(&self) -> Vec<TabElement> {
        let tree = self.lock();
        tree.order
            .iter()
            .filter_map(|id| {
                let attributes = &tree.elements.get(id)?.attributes;
                let target = if let Some(view) = attributes.get(DATA_VIEW) {
                    TabTarget::View(view.clone())
                } else {
                    TabTarget::Page(attributes.get(DATA_PAGE)?.clone())
                };
                Some(TabElement {
                    element: id.clone(),
                    target,
                })
            })
            .collect()
    }

    fn add_click_listener(&self, element: &str, handler: ClickHandler) -> Option<ListenerId> {
        let mut tree = self.lock();
        tree.next_listener += 1;
        let listener = tree.next_listener;
        tree.elements
            .get_mut(element)?
            .listeners
            .push((listener, handler));
        Some(listener)
    }

    fn remove_click_listener(&self, element: &str, listener: ListenerId) {
        if let Some(element) = self.lock().elements.get_mut(element) {
            element.listeners.retain(|(id, _)| *id != listener);
        }
    }

    fn apply(&self, updates: Vec<DomUpdate>) {
        let mut tree = self.lock();
        for update in updates {
            match update {
                DomUpdate::Class {
                    element,
                    class,
                    enabled,
                } => {
                    if let Some(element) = tree.elements.get_mut(&element) {
                        if enabled {
                            element.classes.insert(class.to_string());
                        } else {
                            element.classes.remove(class);
                        }
                    }
                }
                DomUpdate::Attribute {
                    element,
                    name,
                    value,
                } => {
                    if let Some(element) = tree.elements.get_mut(&element) {
                        element.attributes.insert(name.to_string(), value);
                    }
                }
                DomUpdate::Visible { element, visible } => {
                    if let Some(element) = tree.elements.get_mut(&element) {
                        element.visible = visible;
                    }
                }
                DomUpdate::LoadingOverlay(visible) => tree.loading_overlay = visible,
            }
        }
    }

    fn focus(&self, element: &str) {
        let mut tree = self.lock();
        if tree.elements.contains_key(element) {
            tree.focused = Some(element.to_string());
        } else {
            tracing::debug!("Cannot focus missing element {}", element);
        }
    }
}
