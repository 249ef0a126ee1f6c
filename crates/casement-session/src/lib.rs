//! Casement Session Persistence
//!
//! - Open tabs are saved as a flat, ordered list of `{url, title}` records
//! - A save never replaces a non-empty list with an empty one
//! - Window creation options carry either a starting URL or tabs to restore

mod error;
mod options;
mod persistence;
mod saved;

pub use error::SessionError;
pub use options::{InitialContent, SessionOptions};
pub use persistence::{SaveOutcome, TabPersistence, DEFAULT_TAB_TITLE, SAVED_TABS_KEY};
pub use saved::SavedTabRecord;

pub type Result<T> = std::result::Result<T, SessionError>;
