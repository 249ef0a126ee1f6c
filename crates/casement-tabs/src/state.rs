//! Observable session state
//!
//! Windows are kept in registration order so that snapshots enumerate them
//! the way they were opened. Tabs are keyed by id; each window owns the
//! ordered list of its tab ids.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::tab::TabRecord;
use crate::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowRecord {
    pub id: String,
    /// Tab ids in display order
    pub tab_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowsState {
    pub focused_window_id: Option<String>,
    /// Windows in the order they were registered
    pub windows: Vec<WindowRecord>,
}

impl WindowsState {
    pub fn get(&self, window_id: &str) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    fn get_mut(&mut self, window_id: &str) -> Option<&mut WindowRecord> {
        self.windows.iter_mut().find(|w| w.id == window_id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TabsState {
    pub tabs: HashMap<String, TabRecord>,
}

/// Point-in-time copy of the whole store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub windows: WindowsState,
    pub tabs: TabsState,
}

#[derive(Debug, Default)]
struct Inner {
    windows: WindowsState,
    tabs: TabsState,
}

/// Shared handle to the observable window/tab state.
///
/// Clones share the same underlying state.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Inner>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.inner.read();
        SessionSnapshot {
            windows: inner.windows.clone(),
            tabs: inner.tabs.clone(),
        }
    }

    /// Add a window record. Registering an id twice keeps the first record.
    pub fn register_window(&self, window_id: &str) {
        let mut inner = self.inner.write();
        if inner.windows.get(window_id).is_some() {
            return;
        }

        inner.windows.windows.push(WindowRecord {
            id: window_id.to_string(),
            tab_ids: Vec::new(),
        });

        tracing::debug!(window_id = %window_id, "Registered window in session state");
    }

    /// Drop a window and every tab it owns. Returns false if it was unknown.
    pub fn remove_window(&self, window_id: &str) -> bool {
        let mut inner = self.inner.write();
        let Some(index) = inner.windows.windows.iter().position(|w| w.id == window_id) else {
            return false;
        };

        let record = inner.windows.windows.remove(index);
        for tab_id in &record.tab_ids {
            inner.tabs.tabs.remove(tab_id);
        }

        if inner.windows.focused_window_id.as_deref() == Some(window_id) {
            inner.windows.focused_window_id = None;
        }

        tracing::debug!(
            window_id = %window_id,
            tab_count = record.tab_ids.len(),
            "Removed window from session state"
        );

        true
    }

    pub fn set_focused_window(&self, window_id: Option<&str>) {
        self.inner.write().windows.focused_window_id = window_id.map(str::to_string);
    }

    pub fn focused_window_id(&self) -> Option<String> {
        self.inner.read().windows.focused_window_id.clone()
    }

    pub fn window(&self, window_id: &str) -> Option<WindowRecord> {
        self.inner.read().windows.get(window_id).cloned()
    }

    pub fn tab(&self, tab_id: &str) -> Option<TabRecord> {
        self.inner.read().tabs.tabs.get(tab_id).cloned()
    }

    pub fn window_count(&self) -> usize {
        self.inner.read().windows.windows.len()
    }

    pub(crate) fn insert_tab(&self, tab: TabRecord) -> bool {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        let Some(window) = inner.windows.get_mut(&tab.window_id) else {
            return false;
        };

        window.tab_ids.push(tab.id.clone());
        inner.tabs.tabs.insert(tab.id.clone(), tab);
        true
    }

    pub(crate) fn update_tab<F>(&self, tab_id: &str, f: F) -> Option<Result<TabRecord>>
    where
        F: FnOnce(&mut TabRecord) -> Result<()>,
    {
        let mut inner = self.inner.write();
        let tab = inner.tabs.tabs.get_mut(tab_id)?;
        Some(f(&mut *tab).map(|()| tab.clone()))
    }

    pub(crate) fn take_tab(&self, tab_id: &str) -> Option<TabRecord> {
        let mut inner = self.inner.write();
        let tab = inner.tabs.tabs.remove(tab_id)?;
        if let Some(window) = inner.windows.get_mut(&tab.window_id) {
            window.tab_ids.retain(|id| id != tab_id);
        }
        Some(tab)
    }

    pub(crate) fn move_tab(&self, tab_id: &str, new_index: usize) -> bool {
        let mut inner = self.inner.write();
        let Some(window_id) = inner.tabs.tabs.get(tab_id).map(|t| t.window_id.clone()) else {
            return false;
        };
        let Some(window) = inner.windows.get_mut(&window_id) else {
            return false;
        };
        let Some(current_index) = window.tab_ids.iter().position(|id| id == tab_id) else {
            return false;
        };

        let tab_id = window.tab_ids.remove(current_index);
        let insert_index = new_index.min(window.tab_ids.len());
        window.tab_ids.insert(insert_index, tab_id);
        true
    }
}

impl Clone for SessionStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
