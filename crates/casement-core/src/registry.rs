//! Registry of live windows
//!
//! The registry is the only answer to "is any window open?"; the platform's
//! own window list may still include windows that are tearing down.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::surface::WindowSurface;

/// Opaque identity of one window for the lifetime of the process
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(String);

impl WindowId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for WindowId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for WindowId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Default)]
pub struct WindowRegistry {
    windows: HashMap<WindowId, Arc<dyn WindowSurface>>,
    /// Creation order, used when every window has to be walked
    order: Vec<WindowId>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a window. Returns false (and changes nothing) if the id is taken.
    pub fn insert(&mut self, id: WindowId, surface: Arc<dyn WindowSurface>) -> bool {
        if self.windows.contains_key(&id) {
            return false;
        }
        self.order.push(id.clone());
        self.windows.insert(id, surface);
        true
    }

    pub fn remove(&mut self, id: &WindowId) -> Option<Arc<dyn WindowSurface>> {
        let surface = self.windows.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(surface)
    }

    pub fn get(&self, id: &WindowId) -> Option<Arc<dyn WindowSurface>> {
        self.windows.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Ids in creation order
    pub fn ids(&self) -> Vec<WindowId> {
        self.order.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SurfaceError;

    struct StubSurface(WindowId);

    impl WindowSurface for StubSurface {
        fn window_id(&self) -> &WindowId {
            &self.0
        }

        fn init(&self) -> Result<(), SurfaceError> {
            Ok(())
        }

        fn focus(&self) {}

        fn close(&self) {}
    }

    fn stub(id: &str) -> Arc<dyn WindowSurface> {
        Arc::new(StubSurface(WindowId::from(id)))
    }

    #[test]
    fn test_insert_is_unique_per_id() {
        let mut registry = WindowRegistry::new();
        assert!(registry.insert(WindowId::from("a"), stub("a")));
        assert!(!registry.insert(WindowId::from("a"), stub("a")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_once() {
        let mut registry = WindowRegistry::new();
        registry.insert(WindowId::from("a"), stub("a"));
        registry.insert(WindowId::from("b"), stub("b"));

        assert!(registry.remove(&WindowId::from("a")).is_some());
        assert!(registry.remove(&WindowId::from("a")).is_none());
        assert_eq!(registry.ids(), vec![WindowId::from("b")]);
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        assert_ne!(WindowId::generate(), WindowId::generate());
    }
}
