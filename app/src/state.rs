//! Process-level wiring
//!
//! Builds the one lifecycle manager for this process and the collaborators
//! it coordinates. Nothing else constructs a manager.

use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;

use casement_core::headless::{HeadlessApp, HeadlessSurfaceFactory};
use casement_core::{
    lifecycle_channel, Collaborators, Config, Database, LifecycleEvents, LifecycleHandle,
    LifecycleManager, SessionStore,
};

pub struct AppState {
    pub manager: LifecycleManager,
    pub events: LifecycleEvents,
    pub handle: LifecycleHandle,
}

impl AppState {
    pub fn new(config: Config, launch_args: Vec<String>) -> anyhow::Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating data directory {}", parent.display()))?;
        }

        let db = Database::open(&config.database_path)
            .with_context(|| format!("opening {}", config.database_path.display()))?;

        let (handle, events) = lifecycle_channel();
        let collaborators = Collaborators {
            state: SessionStore::new(),
            store: Arc::new(db),
            surfaces: Arc::new(HeadlessSurfaceFactory),
            app: Arc::new(HeadlessApp::new(handle.clone())),
        };

        let manager = LifecycleManager::new(&config, collaborators, handle.clone())
            .with_launch_args(launch_args);

        Ok(Self {
            manager,
            events,
            handle,
        })
    }
}

/// `CASEMENT_CONFIG` overrides the per-user config location
pub fn config_path() -> PathBuf {
    std::env::var_os("CASEMENT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(Config::config_path)
}
