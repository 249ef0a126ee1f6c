//! Saved-tab persistence
//!
//! Tabs are snapshotted when a window closes, while its records are still in
//! the session state. By the time the process shuts down every window has
//! already removed itself, so a late snapshot would be empty; an empty
//! snapshot therefore never replaces what is already stored.

use serde_json::Value;
use std::sync::Arc;

use casement_storage::KeyValueStore;
use casement_tabs::SessionSnapshot;

use crate::saved::SavedTabRecord;
use crate::Result;

/// Storage slot holding the saved tab list
pub const SAVED_TABS_KEY: &str = "saved_tabs";

/// Title recorded for tabs that never reported one
pub const DEFAULT_TAB_TITLE: &str = "New Tab";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The stored list was replaced with this many records
    Saved(usize),
    /// Nothing worth saving; the stored list was left alone
    SkippedEmpty,
}

pub struct TabPersistence {
    store: Arc<dyn KeyValueStore>,
    key: String,
    default_title: String,
}

impl TabPersistence {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key: SAVED_TABS_KEY.to_string(),
            default_title: DEFAULT_TAB_TITLE.to_string(),
        }
    }

    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = title.into();
        self
    }

    /// Read the saved tab list; a missing slot reads as an empty list
    pub fn load(&self) -> Result<Vec<SavedTabRecord>> {
        let value = self.store.get_or(&self.key, Value::Array(Vec::new()))?;
        Ok(serde_json::from_value(value)?)
    }

    /// Flatten every window's tabs, in window order then tab order.
    /// Tabs that have not resolved a URL yet are skipped.
    pub fn collect(&self, snapshot: &SessionSnapshot) -> Vec<SavedTabRecord> {
        snapshot
            .windows
            .windows
            .iter()
            .flat_map(|window| window.tab_ids.iter())
            .filter_map(|tab_id| snapshot.tabs.tabs.get(tab_id))
            .filter(|tab| tab.is_resolved())
            .filter_map(|tab| {
                let url = tab.url.clone()?;
                let title = tab.display_title(&self.default_title).to_string();
                Some(SavedTabRecord { url, title })
            })
            .collect()
    }

    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<SaveOutcome> {
        let tabs = self.collect(snapshot);
        if tabs.is_empty() {
            tracing::debug!("No resolved tabs to save; keeping stored list");
            return Ok(SaveOutcome::SkippedEmpty);
        }

        let value = serde_json::to_value(&tabs)?;
        self.store.set_value(&self.key, &value)?;

        tracing::debug!(tab_count = tabs.len(), "Saved tab state");

        Ok(SaveOutcome::Saved(tabs.len()))
    }
}

impl Clone for TabPersistence {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key.clone(),
            default_title: self.default_title.clone(),
        }
    }
}
