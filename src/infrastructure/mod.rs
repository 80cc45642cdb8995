// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod content;
pub mod memory_document;
pub mod memory_history;
pub mod notifier;
pub mod role_policy;
