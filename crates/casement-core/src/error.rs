//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Window surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Application is quitting; no new windows can be opened")]
    Quitting,
}

#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("Tab error: {0}")]
    Tab(#[from] casement_tabs::TabError),

    #[error("Failed to initialize window {window_id}: {reason}")]
    Init { window_id: String, reason: String },
}

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Config(e.to_string())
    }
}
