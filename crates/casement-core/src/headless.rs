//! Headless window surfaces
//!
//! Surfaces with no pixels behind them. They keep the session state honest
//! (register on init, remove on close) so the lifecycle protocol can run on
//! machines without a display, and in tests.

use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use casement_session::InitialContent;
use casement_tabs::TabManager;

use crate::error::SurfaceError;
use crate::event::{LifecycleEvent, LifecycleHandle};
use crate::platform::AppControl;
use crate::registry::WindowId;
use crate::surface::{SurfaceConfig, SurfaceFactory, WindowSurface};

pub struct HeadlessSurface {
    window_id: WindowId,
    tabs: TabManager,
    lifecycle: LifecycleHandle,
    initial: InitialContent,
    passthrough: Map<String, Value>,
    closed: AtomicBool,
}

impl HeadlessSurface {
    pub fn new(config: SurfaceConfig) -> Self {
        Self {
            window_id: config.window_id,
            tabs: TabManager::new(config.state),
            lifecycle: config.lifecycle,
            initial: config.initial,
            passthrough: config.passthrough,
            closed: AtomicBool::new(false),
        }
    }

    /// A pass-through option this window was opened with
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.passthrough.get(key)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn open_initial_tabs(&self) -> Result<(), SurfaceError> {
        let id = self.window_id.as_str();

        match &self.initial {
            InitialContent::Blank => {
                self.tabs.open_tab(id, None, None)?;
            }
            InitialContent::Url(url) => {
                self.tabs.open_tab(id, Some(url.clone()), None)?;
            }
            InitialContent::Tabs(saved) => {
                for record in saved {
                    if let Err(e) =
                        self.tabs
                            .open_tab(id, Some(record.url.clone()), Some(record.title.clone()))
                    {
                        tracing::warn!(url = %record.url, error = %e, "Skipping unrestorable tab");
                    }
                }

                if self.tabs.window_tabs(id)?.is_empty() {
                    self.tabs.open_tab(id, None, None)?;
                }
            }
        }

        Ok(())
    }
}

impl WindowSurface for HeadlessSurface {
    fn window_id(&self) -> &WindowId {
        &self.window_id
    }

    fn init(&self) -> Result<(), SurfaceError> {
        let state = self.tabs.state();
        state.register_window(self.window_id.as_str());

        if let Err(e) = self.open_initial_tabs() {
            state.remove_window(self.window_id.as_str());
            return Err(e);
        }

        state.set_focused_window(Some(self.window_id.as_str()));

        tracing::debug!(
            window_id = %self.window_id,
            options = self.passthrough.len(),
            "Headless window ready"
        );

        Ok(())
    }

    fn focus(&self) {
        if self.is_closed() {
            return;
        }
        self.tabs
            .state()
            .set_focused_window(Some(self.window_id.as_str()));
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        self.tabs.state().remove_window(self.window_id.as_str());
        self.lifecycle
            .send(LifecycleEvent::WindowClosed(self.window_id.clone()));
    }
}

/// Builds [`HeadlessSurface`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessSurfaceFactory;

impl SurfaceFactory for HeadlessSurfaceFactory {
    fn build(&self, config: SurfaceConfig) -> Arc<dyn WindowSurface> {
        Arc::new(HeadlessSurface::new(config))
    }
}

/// Host application without a windowing system.
///
/// An exit request plays out the platform's shutdown sequence on the
/// lifecycle channel: before-quit, will-quit, then exited.
pub struct HeadlessApp {
    lifecycle: LifecycleHandle,
    exiting: AtomicBool,
}

impl HeadlessApp {
    pub fn new(lifecycle: LifecycleHandle) -> Self {
        Self {
            lifecycle,
            exiting: AtomicBool::new(false),
        }
    }
}

impl AppControl for HeadlessApp {
    fn request_exit(&self) {
        if self.exiting.swap(true, Ordering::SeqCst) {
            tracing::debug!("Exit already in progress");
            return;
        }

        for event in [
            LifecycleEvent::BeforeQuit,
            LifecycleEvent::WillQuit,
            LifecycleEvent::Exited,
        ] {
            self.lifecycle.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::event::{lifecycle_channel, LifecycleEvents};
    use crate::lifecycle::{Collaborators, LifecycleManager, LifecyclePhase};
    use crate::platform::Platform;
    use casement_session::{SavedTabRecord, SessionOptions, TabPersistence};
    use casement_storage::{Database, KeyValueStore, MemoryStore};
    use casement_tabs::SessionStore;
    use serde_json::json;

    fn surface_config(initial: InitialContent) -> (SurfaceConfig, LifecycleEvents) {
        let (handle, events) = lifecycle_channel();
        let config = SurfaceConfig {
            window_id: WindowId::from("w1"),
            state: SessionStore::new(),
            lifecycle: handle,
            initial,
            passthrough: Map::new(),
        };
        (config, events)
    }

    fn headless_manager(
        platform: Platform,
        store: Arc<dyn KeyValueStore>,
    ) -> (LifecycleManager, LifecycleEvents) {
        let (handle, events) = lifecycle_channel();
        let mut config = Config::new(std::env::temp_dir());
        config.platform = platform;

        let manager = LifecycleManager::new(
            &config,
            Collaborators {
                state: SessionStore::new(),
                store,
                surfaces: Arc::new(HeadlessSurfaceFactory),
                app: Arc::new(HeadlessApp::new(handle.clone())),
            },
            handle,
        );
        (manager, events)
    }

    #[test]
    fn test_init_registers_and_focuses() {
        let (config, _events) = surface_config(InitialContent::Url("https://example.com".into()));
        let state = config.state.clone();
        let surface = HeadlessSurface::new(config);

        surface.init().unwrap();

        let window = state.window("w1").unwrap();
        assert_eq!(window.tab_ids.len(), 1);
        assert_eq!(state.focused_window_id().as_deref(), Some("w1"));
    }

    #[test]
    fn test_restores_tabs_skipping_bad_urls() {
        let (config, _events) = surface_config(InitialContent::Tabs(vec![
            SavedTabRecord::new("https://a.example", "A"),
            SavedTabRecord::new("", "Broken"),
            SavedTabRecord::new("https://b.example", "B"),
        ]));
        let state = config.state.clone();
        let surface = HeadlessSurface::new(config);

        surface.init().unwrap();

        let tabs = TabManager::new(state).window_tabs("w1").unwrap();
        let titles: Vec<_> = tabs.iter().filter_map(|t| t.title.as_deref()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn test_bad_initial_url_fails_init_cleanly() {
        let (config, _events) = surface_config(InitialContent::Url("not a url".into()));
        let state = config.state.clone();
        let surface = HeadlessSurface::new(config);

        assert!(surface.init().is_err());
        assert_eq!(state.window_count(), 0);
    }

    #[test]
    fn test_close_removes_state_and_notifies_once() {
        let (config, mut events) = surface_config(InitialContent::Blank);
        let state = config.state.clone();
        let surface = HeadlessSurface::new(config);
        surface.init().unwrap();

        surface.close();
        surface.close();

        assert_eq!(state.window_count(), 0);
        assert!(surface.is_closed());
        assert_eq!(
            events.try_next(),
            Some(LifecycleEvent::WindowClosed(WindowId::from("w1")))
        );
        assert_eq!(events.try_next(), None);
    }

    #[test]
    fn test_passthrough_options_reach_surface() {
        let (mut config, _events) = surface_config(InitialContent::Blank);
        config.passthrough.insert("width".to_string(), json!(1280));
        let surface = HeadlessSurface::new(config);

        assert_eq!(surface.option("width"), Some(&json!(1280)));
        assert_eq!(surface.option("height"), None);
    }

    #[test]
    fn test_exit_sequence_posted_once() {
        let (handle, mut events) = lifecycle_channel();
        let app = HeadlessApp::new(handle);

        app.request_exit();
        app.request_exit();

        assert_eq!(events.try_next(), Some(LifecycleEvent::BeforeQuit));
        assert_eq!(events.try_next(), Some(LifecycleEvent::WillQuit));
        assert_eq!(events.try_next(), Some(LifecycleEvent::Exited));
        assert_eq!(events.try_next(), None);
    }

    #[tokio::test]
    async fn test_last_window_close_runs_to_termination() {
        let store = MemoryStore::new();
        let (mut manager, mut events) = headless_manager(Platform::Linux, Arc::new(store.clone()));
        let handle = manager.handle();

        manager.init();
        handle.send(LifecycleEvent::Ready);
        manager.process_pending(&mut events);

        let id = manager.window_ids()[0].clone();
        let tabs = manager.tab_manager().unwrap().clone();
        let tab = tabs.window_tabs(id.as_str()).unwrap().remove(0);
        tabs.navigate(&tab.id, "https://example.com/".to_string()).unwrap();
        tabs.set_title(&tab.id, "Example".to_string()).unwrap();

        handle.send(LifecycleEvent::CloseRequested(id));
        manager.run(&mut events).await;

        assert_eq!(manager.phase(), LifecyclePhase::Terminated);
        assert_eq!(manager.window_count(), 0);
        assert_eq!(
            TabPersistence::new(Arc::new(store)).load().unwrap(),
            vec![SavedTabRecord::new("https://example.com/", "Example")]
        );
    }

    #[tokio::test]
    async fn test_quit_with_open_windows_saves_all_of_them() {
        let db = Database::open_in_memory().unwrap();
        let (mut manager, mut events) = headless_manager(Platform::MacOs, Arc::new(db.clone()));
        let handle = manager.handle();

        manager.init();
        handle.send(LifecycleEvent::Ready);
        handle.send(LifecycleEvent::CreateWindow(SessionOptions::with_url(
            "https://one.example",
        )));
        handle.send(LifecycleEvent::CreateWindow(SessionOptions::with_url(
            "https://two.example",
        )));
        handle.send(LifecycleEvent::Quit);
        manager.run(&mut events).await;

        assert_eq!(manager.phase(), LifecyclePhase::Terminated);
        assert_eq!(manager.window_count(), 0);

        // The blank startup tab has no URL and is not saved
        let saved = TabPersistence::new(Arc::new(db)).load().unwrap();
        let urls: Vec<&str> = saved.iter().map(|t| t.url.as_str()).collect();
        assert_eq!(urls, vec!["https://one.example", "https://two.example"]);
    }

    #[tokio::test]
    async fn test_restart_restores_previous_session() {
        let store = MemoryStore::new();

        {
            let (mut manager, mut events) =
                headless_manager(Platform::Windows, Arc::new(store.clone()));
            let handle = manager.handle();
            manager.init();
            handle.send(LifecycleEvent::CreateWindow(SessionOptions::with_url(
                "https://kept.example",
            )));
            handle.send(LifecycleEvent::Quit);
            manager.run(&mut events).await;
        }

        let (mut manager, mut events) = headless_manager(Platform::Windows, Arc::new(store));
        manager.init();
        manager.handle().send(LifecycleEvent::Ready);
        manager.process_pending(&mut events);

        let id = manager.window_ids()[0].clone();
        let tabs = manager.tab_manager().unwrap().window_tabs(id.as_str()).unwrap();
        assert_eq!(tabs.len(), 1);
        assert_eq!(tabs[0].url.as_deref(), Some("https://kept.example"));
        assert_eq!(tabs[0].title.as_deref(), Some("New Tab"));
    }
}
