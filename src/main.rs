// Main entry point - dependency injection and headless navigation shell
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

use dashboard_navigation::application::content_registry::ContentRegistry;
use dashboard_navigation::application::navigation_history::NavigationHistory;
use dashboard_navigation::domain::keyboard::{FocusTarget, KeyPress};
use dashboard_navigation::domain::view::{AnalyticsPage, DashboardView};
use dashboard_navigation::infrastructure::config::load_navigation_config;
use dashboard_navigation::infrastructure::content::LoggingContentManager;
use dashboard_navigation::infrastructure::memory_document::MemoryDocument;
use dashboard_navigation::infrastructure::memory_history::MemoryHistory;
use dashboard_navigation::infrastructure::notifier::LogNotifier;
use dashboard_navigation::presentation::app_state::{AppState, HostParts};
use dashboard_navigation::presentation::handlers::{run_event_loop, NavEvent, StateSnapshot};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = load_navigation_config()?;

    // Simulated browser surface (infrastructure layer)
    let initial_hash = std::env::args().nth(1).unwrap_or_default();
    let document = Arc::new(MemoryDocument::dashboard());
    let history = Arc::new(MemoryHistory::new(&initial_hash));
    let content = placeholder_content();

    // Navigation layer (application + presentation)
    let host = HostParts {
        document: document.clone(),
        history: history.clone(),
        content,
        notifier: Arc::new(LogNotifier),
    };
    let (state, rx) = AppState::build(&config, host);

    match state.coordinator.start() {
        Ok(pending) => {
            pending.finish().await;
        }
        Err(e) => tracing::error!("Initial navigation failed: {}", e),
    }
    let event_loop = tokio::spawn(run_event_loop(state.clone(), rx));
    print_snapshot(&state)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => break,
            ["state"] => {}
            ["click", element] => {
                if document.click(element) == 0 {
                    tracing::warn!("Nothing listens for clicks on {}", element);
                }
            }
            ["key", key, flags @ ..] => {
                state.events.send(NavEvent::KeyDown(key_press(key, flags)))?;
            }
            ["hash", hash] => history.navigate(hash),
            ["hash"] => history.navigate(""),
            ["back"] => {
                if history.back().is_none() {
                    tracing::warn!("Already at the oldest history entry");
                }
            }
            ["forward"] => {
                if history.forward().is_none() {
                    tracing::warn!("Already at the newest history entry");
                }
            }
            ["go", id] => state.events.send(NavEvent::Navigate(id.to_string()))?,
            ["rerender"] => {
                state.tabs_rerendered();
            }
            _ => {
                tracing::warn!("Unrecognized command: {}", line.trim());
                continue;
            }
        }

        let (tx, rx) = oneshot::channel();
        state.events.send(NavEvent::Settle(tx))?;
        rx.await?;
        print_snapshot(&state)?;
    }

    state.events.send(NavEvent::Shutdown)?;
    event_loop.await?;
    tracing::debug!("Final history: {:?} at {:?}", history.entries(), history.current_hash());

    Ok(())
}

fn placeholder_content() -> ContentRegistry {
    let views = DashboardView::ALL.into_iter().fold(ContentRegistry::new(), |registry, view| {
        registry.with_view(view, Arc::new(LoggingContentManager::new(view.label())))
    });
    AnalyticsPage::ALL.into_iter().fold(views, |registry, page| {
        registry.with_page(page, Arc::new(LoggingContentManager::new(page.label())))
    })
}

/// `key ArrowRight ctrl input` style arguments
fn key_press(key: &str, flags: &[&str]) -> KeyPress {
    let mut press = KeyPress::new(key);
    for flag in flags {
        match *flag {
            "ctrl" => press.ctrl = true,
            "alt" => press.alt = true,
            "meta" => press.meta = true,
            tag => press.target = FocusTarget::from_tag(tag),
        }
    }
    press
}

fn print_snapshot(state: &AppState) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(&StateSnapshot::capture(state))?);
    Ok(())
}
