// In-memory browser history - back stack, traversal and hashchange dispatch
use crate::application::navigation_history::{HashChangeListener, NavigationHistory};
use std::sync::Mutex;

struct Entries {
    stack: Vec<String>,
    index: usize,
    listener: Option<HashChangeListener>,
}

/// Mirrors browser semantics: `push` truncates forward entries and fires
/// `hashchange`, `replace` fires nothing, `back`/`forward` fire on arrival.
pub struct MemoryHistory {
    entries: Mutex<Entries>,
}

impl MemoryHistory {
    pub fn new(initial_hash: &str) -> Self {
        Self {
            entries: Mutex::new(Entries {
                stack: vec![normalize(initial_hash)],
                index: 0,
                listener: None,
            }),
        }
    }

    /// Number of entries in the back/forward stack
    pub fn len(&self) -> usize {
        self.lock().stack.len()
    }

    pub fn back(&self) -> Option<String> {
        self.traverse(-1)
    }

    pub fn forward(&self) -> Option<String> {
        self.traverse(1)
    }

    /// Simulate the user typing a new hash into the address bar
    pub fn navigate(&self, hash: &str) {
        self.push(hash);
    }

    pub fn entries(&self) -> Vec<String> {
        self.lock().stack.clone()
    }

    fn traverse(&self, delta: isize) -> Option<String> {
        let (hash, listener) = {
            let mut entries = self.lock();
            let target = entries.index.checked_add_signed(delta)?;
            if target >= entries.stack.len() {
                return None;
            }
            entries.index = target;
            (entries.stack[target].clone(), entries.listener.clone())
        };
        if let Some(listener) = listener {
            listener(&hash);
        }
        Some(hash)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl NavigationHistory for MemoryHistory {
    fn current_hash(&self) -> String {
        let entries = self.lock();
        entries.stack[entries.index].clone()
    }

    fn replace(&self, hash: &str) {
        let mut entries = self.lock();
        let index = entries.index;
        entries.stack[index] = normalize(hash);
    }

    fn push(&self, hash: &str) {
        let hash = normalize(hash);
        let listener = {
            let mut entries = self.lock();
            if entries.stack[entries.index] == hash {
                // Assigning the same hash is not a navigation
                return;
            }
            let next = entries.index + 1;
            entries.stack.truncate(next);
            entries.stack.push(hash.clone());
            entries.index = next;
            entries.listener.clone()
        };
        if let Some(listener) = listener {
            listener(&hash);
        }
    }

    fn subscribe(&self, listener: HashChangeListener) {
        self.lock().listener = Some(listener);
    }

    fn unsubscribe(&self) {
        self.lock().listener = None;
    }
}

/// `#` alone reads back as an empty hash, as `location.hash` does
fn normalize(hash: &str) -> String {
    match hash {
        "" | "#" => String::new(),
        h if h.starts_with('#') => h.to_string(),
        h => format!("#{}", h),
    }
}
