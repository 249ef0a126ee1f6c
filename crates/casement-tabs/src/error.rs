//! Tab error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabError {
    #[error("Tab not found: {0}")]
    NotFound(String),

    #[error("Window not found: {0}")]
    WindowNotFound(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
