// Content manager contract - one per dashboard view or analytics page
use async_trait::async_trait;

/// Renders and owns the content behind one view or page.
///
/// `init` must be idempotent. `destroy` stops background work (timers,
/// subscriptions) and is always called before a different view is
/// initialized.
#[async_trait]
pub trait ContentManager: Send + Sync {
    async fn init(&self) -> anyhow::Result<()>;

    fn destroy(&self) {}
}
