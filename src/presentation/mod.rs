// Presentation layer - UI event intake
pub mod app_state;
pub mod handlers;
