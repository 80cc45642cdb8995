// Tab controller - click bindings and roving-tabindex state for navigation tabs
use crate::application::document::{
    ClickHandler, Document, DomUpdate, ListenerId, TabElement, TabGroup, TabTarget,
};
use crate::domain::catalog::ElementId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Selection callback handed the raw target of the clicked tab
pub type SelectHandler = Arc<dyn Fn(TabTarget) + Send + Sync>;

#[derive(Default)]
struct Bindings {
    /// element -> the one listener currently attached to it
    listeners: HashMap<ElementId, ListenerId>,
    on_select: Option<SelectHandler>,
}

#[derive(Clone)]
pub struct TabController {
    document: Arc<dyn Document>,
    bindings: Arc<Mutex<Bindings>>,
}

impl TabController {
    pub fn new(document: Arc<dyn Document>) -> Self {
        Self {
            document,
            bindings: Arc::new(Mutex::new(Bindings::default())),
        }
    }

    /// Bind one click handler per discovered tab.
    ///
    /// Any handler previously attached by this controller to the same
    /// element is removed first, so repeated binds never stack handlers.
    pub fn bind_tabs(&self, on_select: SelectHandler) -> usize {
        let mut bindings = self.lock();
        bindings.on_select = Some(on_select.clone());

        let tabs = self.document.tabs();
        for tab in &tabs {
            if let Some(previous) = bindings.listeners.remove(&tab.element) {
                self.document.remove_click_listener(&tab.element, previous);
            }

            let target = tab.target.clone();
            let select = on_select.clone();
            let handler: ClickHandler = Arc::new(move |_element: &str| select(target.clone()));

            match self.document.add_click_listener(&tab.element, handler) {
                Some(listener) => {
                    bindings.listeners.insert(tab.element.clone(), listener);
                }
                None => tracing::warn!("Tab {} vanished before it could be bound", tab.element),
            }
        }

        // Tabs removed from the document since the last bind
        let live: Vec<&ElementId> = tabs.iter().map(|tab| &tab.element).collect();
        let stale: Vec<ElementId> = bindings
            .listeners
            .keys()
            .filter(|element| !live.contains(element))
            .cloned()
            .collect();
        for element in stale {
            if let Some(listener) = bindings.listeners.remove(&element) {
                self.document.remove_click_listener(&element, listener);
            }
        }

        tracing::debug!("Bound {} navigation tabs", bindings.listeners.len());
        bindings.listeners.len()
    }

    /// Re-discover tabs after a re-render and bind them with the last handler
    pub fn rebind(&self) -> usize {
        let on_select = self.lock().on_select.clone();
        match on_select {
            Some(on_select) => self.bind_tabs(on_select),
            None => 0,
        }
    }

    pub fn unbind_all(&self) {
        let mut bindings = self.lock();
        for (element, listener) in bindings.listeners.drain() {
            self.document.remove_click_listener(&element, listener);
        }
        bindings.on_select = None;
    }

    pub fn bound_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Mark the tab whose target id equals `id` active within `group`.
    ///
    /// At most one tab of the group ends with `aria-selected="true"` and
    /// `tabindex="0"`: when several tabs share a target only the first in
    /// document order wins. The update is applied as a single batch.
    pub fn set_active(&self, group: TabGroup, id: &str) {
        let mut matched = false;
        let updates = self
            .document
            .tabs()
            .into_iter()
            .filter(|tab| tab.target.group() == group)
            .flat_map(|tab| {
                let active = !matched && tab.target.id() == id;
                matched |= active;
                tab_updates(&tab, active)
            })
            .collect();
        self.document.apply(updates);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Bindings> {
        self.bindings.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn tab_updates(tab: &TabElement, active: bool) -> [DomUpdate; 3] {
    [
        DomUpdate::Class {
            element: tab.element.clone(),
            class: "active",
            enabled: active,
        },
        DomUpdate::Attribute {
            element: tab.element.clone(),
            name: "aria-selected",
            value: active.to_string(),
        },
        DomUpdate::Attribute {
            element: tab.element.clone(),
            name: "tabindex",
            value: if active { "0" } else { "-1" }.to_string(),
        },
    ]
}
