//! Window-session lifecycle manager
//!
//! ```text
//! Idle --init--> Starting --ready--> Active --before-quit--> Draining --exited--> Terminated
//! ```
//!
//! The manager is owned by the loop that feeds it events, so the registry
//! and the quitting flag are plain fields. Collaborators talk back through a
//! [`LifecycleHandle`] and never touch either directly.

use std::sync::Arc;

use casement_session::{SaveOutcome, SessionOptions, TabPersistence};
use casement_storage::KeyValueStore;
use casement_tabs::{SessionStore, TabManager};

use crate::config::Config;
use crate::error::CoreError;
use crate::event::{LifecycleEvent, LifecycleEvents, LifecycleHandle};
use crate::launch::find_launch_url;
use crate::platform::{AppControl, Platform};
use crate::registry::{WindowId, WindowRegistry};
use crate::surface::{SurfaceConfig, SurfaceFactory, WindowSurface};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// Constructed, not yet listening for platform signals
    Idle,
    /// Waiting for the platform to report ready
    Starting,
    /// Steady state
    Active,
    /// Shutdown has begun; no new windows
    Draining,
    Terminated,
}

impl LifecyclePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecyclePhase::Idle => "idle",
            LifecyclePhase::Starting => "starting",
            LifecyclePhase::Active => "active",
            LifecyclePhase::Draining => "draining",
            LifecyclePhase::Terminated => "terminated",
        }
    }
}

impl std::fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// External pieces the manager coordinates but does not own
pub struct Collaborators {
    /// Observable window/tab state shared with every surface
    pub state: SessionStore,
    /// Durable target for saved tabs
    pub store: Arc<dyn KeyValueStore>,
    pub surfaces: Arc<dyn SurfaceFactory>,
    pub app: Arc<dyn AppControl>,
}

pub struct LifecycleManager {
    platform: Platform,
    launch_url_hosts: Vec<String>,
    launch_args: Vec<String>,
    state: SessionStore,
    persistence: TabPersistence,
    surfaces: Arc<dyn SurfaceFactory>,
    app: Arc<dyn AppControl>,
    handle: LifecycleHandle,
    tab_manager: Option<TabManager>,
    registry: WindowRegistry,
    quitting: bool,
    phase: LifecyclePhase,
}

impl LifecycleManager {
    pub fn new(config: &Config, collaborators: Collaborators, handle: LifecycleHandle) -> Self {
        let persistence = TabPersistence::new(collaborators.store)
            .with_default_title(config.default_tab_title.clone());

        Self {
            platform: config.platform,
            launch_url_hosts: config.launch_url_hosts.clone(),
            launch_args: Vec::new(),
            state: collaborators.state,
            persistence,
            surfaces: collaborators.surfaces,
            app: collaborators.app,
            handle,
            tab_manager: None,
            registry: WindowRegistry::new(),
            quitting: false,
            phase: LifecyclePhase::Idle,
        }
    }

    /// Process invocation strings scanned for a starting URL on ready
    pub fn with_launch_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.launch_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Start listening for platform signals and bring up the tab subsystem
    pub fn init(&mut self) {
        if self.phase != LifecyclePhase::Idle {
            tracing::warn!(phase = %self.phase, "Lifecycle manager already initialized");
            return;
        }

        self.tab_manager = Some(TabManager::new(self.state.clone()));
        self.phase = LifecyclePhase::Starting;

        tracing::info!(platform = %self.platform, "Lifecycle manager initialized");
    }

    /// Drive the manager until the platform reports shutdown complete
    pub async fn run(&mut self, events: &mut LifecycleEvents) {
        while self.phase != LifecyclePhase::Terminated {
            match events.recv().await {
                Some(event) => self.dispatch(event),
                None => {
                    tracing::warn!("Lifecycle channel closed before shutdown completed");
                    break;
                }
            }
        }

        // Close notifications posted during shutdown may trail the exit signal
        let drained = self.process_pending(events);

        tracing::info!(drained, window_count = self.registry.len(), "Lifecycle loop finished");
    }

    /// Handle everything already queued without waiting for more
    pub fn process_pending(&mut self, events: &mut LifecycleEvents) -> usize {
        let mut handled = 0;
        while let Some(event) = events.try_next() {
            self.dispatch(event);
            handled += 1;
        }
        handled
    }

    fn dispatch(&mut self, event: LifecycleEvent) {
        let name = event.name();
        if let Err(e) = self.handle_event(event) {
            tracing::error!(event = name, error = %e, "Failed to handle lifecycle event");
        }
    }

    pub fn handle_event(&mut self, event: LifecycleEvent) -> Result<()> {
        tracing::trace!(event = event.name(), phase = %self.phase, "Lifecycle event");

        match event {
            LifecycleEvent::Ready => self.on_ready(),
            LifecycleEvent::Activate => self.on_activate(),
            LifecycleEvent::WindowAllClosed => {
                // The registry decides whether to quit; see handle_window_closed
                tracing::debug!(
                    window_count = self.registry.len(),
                    "Platform reports all windows closed"
                );
                Ok(())
            }
            LifecycleEvent::BeforeQuit => {
                self.on_before_quit();
                Ok(())
            }
            LifecycleEvent::WillQuit => {
                self.close_all_windows();
                Ok(())
            }
            LifecycleEvent::Exited => {
                self.phase = LifecyclePhase::Terminated;
                tracing::info!("Shutdown complete");
                Ok(())
            }
            LifecycleEvent::CreateWindow(options) => self.create_window(options).map(|_| ()),
            LifecycleEvent::CloseRequested(window_id) => {
                self.close_window(&window_id);
                Ok(())
            }
            LifecycleEvent::WindowClosed(window_id) => {
                self.handle_window_closed(&window_id);
                Ok(())
            }
            LifecycleEvent::Quit => {
                self.request_quit();
                Ok(())
            }
        }
    }

    fn on_ready(&mut self) -> Result<()> {
        if self.phase != LifecyclePhase::Starting {
            tracing::warn!(phase = %self.phase, "Ignoring ready signal");
            return Ok(());
        }

        let options = self.resolve_startup_options();
        if let Err(e) = self.create_window(options) {
            // Stays Starting; nothing else would ever end the process here
            if self.platform.quits_when_last_window_closes() {
                tracing::error!(error = %e, "Startup window failed; quitting");
                self.request_quit();
            }
            return Err(e);
        }

        self.phase = LifecyclePhase::Active;
        tracing::info!(window_count = self.registry.len(), "Startup complete");

        Ok(())
    }

    /// Pick the first window's content: a recognized launch URL beats saved
    /// tabs, which beat an empty window.
    pub fn resolve_startup_options(&self) -> SessionOptions {
        if let Some(url) = find_launch_url(self.launch_args.as_slice(), &self.launch_url_hosts) {
            tracing::info!(url = %url, "Opening launch URL; skipping tab restore");
            return SessionOptions::with_url(url);
        }

        match self.persistence.load() {
            Ok(tabs) if !tabs.is_empty() => {
                tracing::info!(tab_count = tabs.len(), "Restoring saved tabs");
                SessionOptions::with_tabs(tabs)
            }
            Ok(_) => SessionOptions::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load saved tabs; starting empty");
                SessionOptions::default()
            }
        }
    }

    fn on_activate(&mut self) -> Result<()> {
        if !self.registry.is_empty() {
            return Ok(());
        }
        if self.quitting {
            tracing::debug!("Ignoring activate while quitting");
            return Ok(());
        }

        tracing::info!("Activated with no windows; opening a new one");
        self.create_window(SessionOptions::default())?;

        // A failed startup window leaves the manager in Starting
        if self.phase == LifecyclePhase::Starting {
            self.phase = LifecyclePhase::Active;
        }
        Ok(())
    }

    fn on_before_quit(&mut self) {
        self.quitting = true;
        if self.phase != LifecyclePhase::Terminated {
            self.phase = LifecyclePhase::Draining;
        }

        tracing::info!(window_count = self.registry.len(), "Quitting");
    }

    /// Open a window, or focus the existing one when `options.window_id` is
    /// already tracked.
    pub fn create_window(&mut self, options: SessionOptions) -> Result<Arc<dyn WindowSurface>> {
        let requested = options.window_id.clone().map(WindowId::from);

        if let Some(existing) = requested.as_ref().and_then(|id| self.registry.get(id)) {
            tracing::debug!(window_id = %existing.window_id(), "Window already open; focusing");
            existing.focus();
            return Ok(existing);
        }

        if self.quitting {
            return Err(CoreError::Quitting);
        }

        let window_id = requested.unwrap_or_else(WindowId::generate);
        let config = SurfaceConfig {
            window_id: window_id.clone(),
            state: self.state.clone(),
            lifecycle: self.handle.clone(),
            initial: options.initial_content(),
            passthrough: options.passthrough,
        };

        let surface = self.surfaces.build(config);
        self.registry.insert(window_id.clone(), Arc::clone(&surface));

        if let Err(e) = surface.init() {
            self.registry.remove(&window_id);
            tracing::error!(window_id = %window_id, error = %e, "Window failed to initialize");
            return Err(e.into());
        }

        tracing::info!(
            window_id = %window_id,
            window_count = self.registry.len(),
            "Created window"
        );

        Ok(surface)
    }

    /// Save tabs while the window is still in the session state, then ask
    /// its surface to tear down.
    fn close_window(&mut self, window_id: &WindowId) {
        let Some(surface) = self.registry.get(window_id) else {
            tracing::debug!(window_id = %window_id, "Close requested for untracked window");
            return;
        };

        self.save_tab_state();
        surface.close();
    }

    fn close_all_windows(&mut self) {
        let ids = self.registry.ids();
        if ids.is_empty() {
            return;
        }

        // One snapshot covering every window, taken before any of them go
        self.save_tab_state();

        for id in ids {
            if let Some(surface) = self.registry.get(&id) {
                surface.close();
            }
        }
    }

    /// Forget a window that finished closing. Unknown ids are ignored.
    pub fn handle_window_closed(&mut self, window_id: &WindowId) {
        if self.registry.remove(window_id).is_none() {
            tracing::debug!(window_id = %window_id, "Ignoring close of untracked window");
            return;
        }

        tracing::info!(
            window_id = %window_id,
            window_count = self.registry.len(),
            "Window closed"
        );

        if self.platform.quits_when_last_window_closes()
            && self.registry.is_empty()
            && !self.quitting
        {
            tracing::info!("Last window closed; quitting");
            self.request_quit();
        }
    }

    /// Mark the process as quitting and ask the platform to exit. Repeated
    /// requests are passed through; the platform tolerates them.
    pub fn request_quit(&mut self) {
        self.quitting = true;
        self.app.request_exit();
    }

    /// Persist the open tabs. Failures are logged and otherwise ignored so
    /// that neither a window close nor shutdown can be blocked by storage.
    pub fn save_tab_state(&self) -> Option<SaveOutcome> {
        match self.persistence.save(&self.state.snapshot()) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::error!(error = %e, "Failed to save tab state");
                None
            }
        }
    }

    pub fn focused_window_controller(&self) -> Option<Arc<dyn WindowSurface>> {
        let focused = self.state.focused_window_id()?;
        self.registry.get(&WindowId::from(focused))
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn window_count(&self) -> usize {
        self.registry.len()
    }

    pub fn window(&self, window_id: &WindowId) -> Option<Arc<dyn WindowSurface>> {
        self.registry.get(window_id)
    }

    /// Open windows in creation order
    pub fn window_ids(&self) -> Vec<WindowId> {
        self.registry.ids()
    }

    pub fn state(&self) -> &SessionStore {
        &self.state
    }

    /// Present once `init` has run
    pub fn tab_manager(&self) -> Option<&TabManager> {
        self.tab_manager.as_ref()
    }

    /// A sender for collaborators that need to post events
    pub fn handle(&self) -> LifecycleHandle {
        self.handle.clone()
    }
}
