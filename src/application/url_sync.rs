// URL synchronizer - keeps the location hash a projection of the ViewState
use crate::application::navigation_history::{HashChangeListener, NavigationHistory};
use crate::domain::hash::{canonical_hash, parse_hash, HashRoute};
use crate::domain::view::ViewState;
use std::sync::Arc;

/// Who asked for the transition, which decides how the hash is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Tab click, key press or programmatic call
    User,
    /// Page load or `hashchange`; the browser already holds the entry
    Url,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashWrite {
    Skipped,
    Replaced,
    Pushed,
}

/// What a hash asks for relative to the current state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The hash already describes the current state
    Current,
    Navigate { target: ViewState, healed: bool },
    /// Nothing in the catalog matches
    Ignored(String),
}

#[derive(Clone)]
pub struct UrlSynchronizer {
    history: Arc<dyn NavigationHistory>,
}

impl UrlSynchronizer {
    pub fn new(history: Arc<dyn NavigationHistory>) -> Self {
        Self { history }
    }

    pub fn current_hash(&self) -> String {
        self.history.current_hash()
    }

    pub fn listen(&self, listener: HashChangeListener) {
        self.history.subscribe(listener);
    }

    pub fn stop_listening(&self) {
        self.history.unsubscribe();
    }

    /// Resolve the hash present at startup. An empty hash keeps the
    /// default state and never triggers a write.
    pub fn resolve_initial(&self, current: ViewState) -> Resolution {
        let hash = self.history.current_hash();
        if matches!(parse_hash(&hash), HashRoute::Empty) {
            return Resolution::Current;
        }
        self.resolve(&hash, current)
    }

    pub fn resolve(&self, hash: &str, current: ViewState) -> Resolution {
        let route = parse_hash(hash);
        let healed = matches!(route, HashRoute::Analytics { healed: true, .. });

        match route.resolve(current) {
            None => {
                tracing::warn!("Ignoring unrecognized location hash {:?}", hash);
                Resolution::Ignored(hash.to_string())
            }
            Some(target) if target == current => Resolution::Current,
            Some(target) => {
                if healed {
                    tracing::warn!(
                        "Unknown analytics page in hash {:?}, falling back to {}",
                        hash,
                        target.page
                    );
                }
                Resolution::Navigate { target, healed }
            }
        }
    }

    /// Write the canonical hash for `state` unless the location already
    /// shows it.
    ///
    /// User-originated analytics states are pushed so sub-page navigation
    /// is back/forward-navigable; everything else replaces the current
    /// entry.
    pub fn write(&self, state: &ViewState, origin: Origin) -> HashWrite {
        let canonical = canonical_hash(state);
        if self.history.current_hash() == canonical {
            tracing::debug!("Hash already canonical ({:?}), skipping write", canonical);
            return HashWrite::Skipped;
        }

        if origin == Origin::User && state.is_analytics() {
            self.history.push(&canonical);
            HashWrite::Pushed
        } else {
            self.history.replace(&canonical);
            HashWrite::Replaced
        }
    }
}
