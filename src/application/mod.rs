// Application layer - navigation use cases and the ports they depend on
pub mod content_manager;
pub mod content_registry;
pub mod coordinator;
pub mod document;
pub mod navigation_history;
pub mod notifier;
pub mod role_gate;
pub mod tab_controller;
pub mod url_sync;
