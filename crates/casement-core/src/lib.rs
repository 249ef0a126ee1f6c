//! Casement Core
//!
//! Process-wide coordination for a multi-window shell: the registry of live
//! windows, the create/close/quit protocol, and restore-on-restart of the
//! user's open tabs.

mod config;
mod error;
mod event;
pub mod headless;
mod launch;
mod lifecycle;
mod platform;
mod registry;
mod surface;

pub use config::Config;
pub use error::{CoreError, SurfaceError};
pub use event::{lifecycle_channel, LifecycleEvent, LifecycleEvents, LifecycleHandle};
pub use launch::find_launch_url;
pub use lifecycle::{Collaborators, LifecycleManager, LifecyclePhase};
pub use platform::{AppControl, Platform};
pub use registry::{WindowId, WindowRegistry};
pub use surface::{SurfaceConfig, SurfaceFactory, WindowSurface};

// Re-export collaborator crates
pub use casement_session::{
    InitialContent, SaveOutcome, SavedTabRecord, SessionError, SessionOptions, TabPersistence,
};
pub use casement_storage::{Database, KeyValueStore, MemoryStore, StorageError};
pub use casement_tabs::{SessionSnapshot, SessionStore, TabError, TabManager, TabRecord};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
