// Placeholder content managers for the headless shell
use crate::application::content_manager::ContentManager;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Logs lifecycle calls in place of real chart/table rendering
#[derive(Debug)]
pub struct LoggingContentManager {
    name: String,
    inits: AtomicUsize,
    destroys: AtomicUsize,
}

impl LoggingContentManager {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inits: AtomicUsize::new(0),
            destroys: AtomicUsize::new(0),
        }
    }

    pub fn init_count(&self) -> usize {
        self.inits.load(Ordering::SeqCst)
    }

    pub fn destroy_count(&self) -> usize {
        self.destroys.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentManager for LoggingContentManager {
    async fn init(&self) -> anyhow::Result<()> {
        let count = self.inits.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!("Initializing {} content (load #{})", self.name, count);
        Ok(())
    }

    fn destroy(&self) {
        self.destroys.fetch_add(1, Ordering::SeqCst);
        tracing::info!("Stopping {} background work", self.name);
    }
}
