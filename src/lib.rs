// Dashboard navigation - view state, URL hash sync, tabs and keyboard routing
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
