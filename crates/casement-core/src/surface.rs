//! Window surface contract
//!
//! A surface controller owns the on-screen window. It registers itself in
//! the session state during `init` and removes itself again on `close`,
//! after which it reports `WindowClosed` through its lifecycle handle.

use serde_json::{Map, Value};
use std::sync::Arc;

use casement_session::InitialContent;
use casement_tabs::SessionStore;

use crate::error::SurfaceError;
use crate::event::LifecycleHandle;
use crate::registry::WindowId;

pub trait WindowSurface: Send + Sync {
    fn window_id(&self) -> &WindowId;

    /// Materialize the window and register it in the session state
    fn init(&self) -> Result<(), SurfaceError>;

    /// Bring the window to the foreground
    fn focus(&self);

    /// Tear the window down; must post `WindowClosed` once done.
    ///
    /// Only the manager calls this, after it has saved tabs. A close the
    /// user or the window system starts must be posted as
    /// [`LifecycleEvent::CloseRequested`](crate::LifecycleEvent::CloseRequested)
    /// instead. Posting `WindowClosed` straight away skips that save.
    fn close(&self);
}

/// Everything a surface needs to come up
#[derive(Debug, Clone)]
pub struct SurfaceConfig {
    pub window_id: WindowId,
    pub state: SessionStore,
    pub lifecycle: LifecycleHandle,
    pub initial: InitialContent,
    /// Options the manager does not interpret
    pub passthrough: Map<String, Value>,
}

pub trait SurfaceFactory: Send + Sync {
    fn build(&self, config: SurfaceConfig) -> Arc<dyn WindowSurface>;
}
