//! Casement Window and Tab State
//!
//! The observable record of every open window and its tabs. Window surfaces
//! write into it as they come and go; the lifecycle manager only reads it,
//! chiefly to snapshot tabs for restore-on-restart.

mod error;
mod manager;
mod state;
mod tab;

pub use error::TabError;
pub use manager::TabManager;
pub use state::{SessionSnapshot, SessionStore, TabsState, WindowRecord, WindowsState};
pub use tab::TabRecord;

pub type Result<T> = std::result::Result<T, TabError>;
