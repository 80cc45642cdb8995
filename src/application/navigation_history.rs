// History abstraction - the two ways the location hash can be written
use std::sync::Arc;

/// Receives the new hash whenever the browser fires `hashchange`
pub type HashChangeListener = Arc<dyn Fn(&str) + Send + Sync>;

/// Browser history as seen by the URL synchronizer.
///
/// `replace` swaps the current entry (no new back-stack entry, no
/// `hashchange`); `push` behaves like assigning `location.hash`: it creates
/// a back-stack entry and fires `hashchange`.
pub trait NavigationHistory: Send + Sync {
    /// Current hash including the leading `#`, or empty
    fn current_hash(&self) -> String;

    fn replace(&self, hash: &str);

    fn push(&self, hash: &str);

    /// Install the single `hashchange` listener, replacing any previous one
    fn subscribe(&self, listener: HashChangeListener);

    fn unsubscribe(&self);
}
