//! Tab Manager
//!
//! Tab-content bookkeeping bound to a [`SessionStore`]. Window surfaces open
//! and update tabs through it; the lifecycle manager co-initializes one on
//! the same store it snapshots from.

use crate::error::TabError;
use crate::state::SessionStore;
use crate::tab::TabRecord;
use crate::Result;

pub struct TabManager {
    state: SessionStore,
}

impl TabManager {
    pub fn new(state: SessionStore) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &SessionStore {
        &self.state
    }

    /// Open a tab at the end of `window_id`'s tab strip
    pub fn open_tab(
        &self,
        window_id: &str,
        url: Option<String>,
        title: Option<String>,
    ) -> Result<TabRecord> {
        let tab = TabRecord::new(window_id.to_string(), url, title)?;

        if !self.state.insert_tab(tab.clone()) {
            return Err(TabError::WindowNotFound(window_id.to_string()));
        }

        tracing::debug!(
            tab_id = %tab.id,
            window_id = %window_id,
            url = tab.url.as_deref().unwrap_or(""),
            "Opened tab"
        );

        Ok(tab)
    }

    pub fn get_tab(&self, tab_id: &str) -> Result<TabRecord> {
        self.state
            .tab(tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))
    }

    /// Record a committed navigation
    pub fn navigate(&self, tab_id: &str, url: String) -> Result<TabRecord> {
        self.state
            .update_tab(tab_id, |tab| tab.navigate(url))
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?
    }

    pub fn set_title(&self, tab_id: &str, title: String) -> Result<TabRecord> {
        self.state
            .update_tab(tab_id, |tab| {
                tab.set_title(title);
                Ok(())
            })
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?
    }

    pub fn close_tab(&self, tab_id: &str) -> Result<TabRecord> {
        let tab = self
            .state
            .take_tab(tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;

        tracing::debug!(tab_id = %tab_id, window_id = %tab.window_id, "Closed tab");

        Ok(tab)
    }

    /// Move a tab within its window; indices past the end clamp to the end
    pub fn move_tab(&self, tab_id: &str, new_index: usize) -> Result<()> {
        if self.state.move_tab(tab_id, new_index) {
            Ok(())
        } else {
            Err(TabError::NotFound(tab_id.to_string()))
        }
    }

    /// Tabs of `window_id` in display order
    pub fn window_tabs(&self, window_id: &str) -> Result<Vec<TabRecord>> {
        let snapshot = self.state.snapshot();
        let window = snapshot
            .windows
            .get(window_id)
            .ok_or_else(|| TabError::WindowNotFound(window_id.to_string()))?;

        Ok(window
            .tab_ids
            .iter()
            .filter_map(|id| snapshot.tabs.tabs.get(id).cloned())
            .collect())
    }
}

impl Clone for TabManager {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_with_window(window_id: &str) -> TabManager {
        let state = SessionStore::new();
        state.register_window(window_id);
        TabManager::new(state)
    }

    #[test]
    fn test_tab_manager() {
        let manager = manager_with_window("w1");

        let tab = manager
            .open_tab("w1", Some("https://example.com".to_string()), None)
            .unwrap();
        assert_eq!(manager.get_tab(&tab.id).unwrap().url.as_deref(), Some("https://example.com"));

        let titled = manager.set_title(&tab.id, "Example".to_string()).unwrap();
        assert_eq!(titled.title.as_deref(), Some("Example"));

        let moved = manager
            .navigate(&tab.id, "https://example.org/".to_string())
            .unwrap();
        assert_eq!(moved.url.as_deref(), Some("https://example.org/"));

        manager.close_tab(&tab.id).unwrap();
        assert!(manager.get_tab(&tab.id).is_err());
        assert!(manager.window_tabs("w1").unwrap().is_empty());
    }

    #[test]
    fn test_open_tab_in_unknown_window() {
        let manager = TabManager::new(SessionStore::new());
        let err = manager.open_tab("ghost", None, None).unwrap_err();
        assert!(matches!(err, TabError::WindowNotFound(_)));
    }

    #[test]
    fn test_failed_navigation_keeps_previous_url() {
        let manager = manager_with_window("w1");
        let tab = manager
            .open_tab("w1", Some("https://example.com".to_string()), None)
            .unwrap();

        assert!(manager.navigate(&tab.id, String::new()).is_err());
        assert_eq!(
            manager.get_tab(&tab.id).unwrap().url.as_deref(),
            Some("https://example.com")
        );
    }

    #[test]
    fn test_tab_order() {
        let manager = manager_with_window("w1");
        let a = manager.open_tab("w1", Some("https://a.example".to_string()), None).unwrap();
        let b = manager.open_tab("w1", Some("https://b.example".to_string()), None).unwrap();
        let c = manager.open_tab("w1", Some("https://c.example".to_string()), None).unwrap();

        manager.move_tab(&c.id, 0).unwrap();
        manager.move_tab(&a.id, 99).unwrap();

        let order: Vec<String> = manager
            .window_tabs("w1")
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(order, vec![c.id, b.id, a.id]);
    }
}
