// Navigation error taxonomy
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("unknown dashboard view: {0}")]
    UnknownView(String),

    #[error("unknown analytics page: {0}")]
    UnknownPage(String),

    #[error("access denied to {target}")]
    AccessDenied { target: String },

    #[error("navigation has been shut down")]
    ShutDown,
}

pub type NavResult<T> = std::result::Result<T, NavigationError>;
