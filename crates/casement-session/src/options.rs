//! Window creation options

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::saved::SavedTabRecord;

/// Options accepted when opening a window.
///
/// Unrecognized fields are kept in `passthrough` and handed to the window
/// surface untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOptions {
    /// Reuse (and focus) this window if it is already open
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_tabs: Option<Vec<SavedTabRecord>>,
    #[serde(flatten)]
    pub passthrough: Map<String, Value>,
}

/// What a freshly created window should show first
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitialContent {
    /// A single blank tab
    Blank,
    Url(String),
    Tabs(Vec<SavedTabRecord>),
}

impl SessionOptions {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            initial_url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn with_tabs(tabs: Vec<SavedTabRecord>) -> Self {
        Self {
            initial_tabs: Some(tabs),
            ..Self::default()
        }
    }

    pub fn with_window_id(mut self, window_id: impl Into<String>) -> Self {
        self.window_id = Some(window_id.into());
        self
    }

    /// Resolve the starting content. An explicit URL takes precedence over
    /// tabs; an empty tab list counts as absent.
    pub fn initial_content(&self) -> InitialContent {
        if let Some(url) = self.initial_url.as_deref().filter(|u| !u.trim().is_empty()) {
            return InitialContent::Url(url.to_string());
        }

        match &self.initial_tabs {
            Some(tabs) if !tabs.is_empty() => InitialContent::Tabs(tabs.clone()),
            _ => InitialContent::Blank,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_initial_content_precedence() {
        assert_eq!(SessionOptions::default().initial_content(), InitialContent::Blank);

        let tabs = vec![SavedTabRecord::new("https://a.example", "A")];
        let mut options = SessionOptions::with_tabs(tabs.clone());
        assert_eq!(options.initial_content(), InitialContent::Tabs(tabs));

        options.initial_url = Some("https://b.example".to_string());
        assert_eq!(
            options.initial_content(),
            InitialContent::Url("https://b.example".to_string())
        );

        assert_eq!(
            SessionOptions::with_tabs(Vec::new()).initial_content(),
            InitialContent::Blank
        );
    }

    #[test]
    fn test_unknown_fields_pass_through() {
        let options: SessionOptions = serde_json::from_value(json!({
            "windowId": "w-1",
            "initialUrl": "https://example.com",
            "width": 1280,
            "title": "Casement"
        }))
        .unwrap();

        assert_eq!(options.window_id.as_deref(), Some("w-1"));
        assert_eq!(options.passthrough.get("width"), Some(&json!(1280)));
        assert_eq!(options.passthrough.get("title"), Some(&json!("Casement")));
        assert!(!options.passthrough.contains_key("windowId"));
    }
}
