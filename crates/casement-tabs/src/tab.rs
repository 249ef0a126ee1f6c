//! Tab record
//!
//! A tab without a URL is still resolving its first navigation; such tabs
//! are visible in the window but are not worth restoring.

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::error::TabError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabRecord {
    /// Unique identifier
    pub id: String,
    /// Window this tab lives in
    pub window_id: String,
    /// Resolved URL, absent while the first load is in flight
    pub url: Option<String>,
    /// Page title as reported by the content
    pub title: Option<String>,
}

impl TabRecord {
    pub fn new(window_id: String, url: Option<String>, title: Option<String>) -> Result<Self> {
        let url = url.map(validate_url).transpose()?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            window_id,
            url,
            title,
        })
    }

    pub fn navigate(&mut self, url: String) -> Result<()> {
        self.url = Some(validate_url(url)?);
        Ok(())
    }

    pub fn set_title(&mut self, title: String) {
        self.title = Some(title);
    }

    /// True once the tab has a URL worth persisting
    pub fn is_resolved(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.is_empty())
    }

    /// Title for display and persistence, with `fallback` for blank titles
    pub fn display_title<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title,
            _ => fallback,
        }
    }
}

fn validate_url(url: String) -> Result<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(TabError::InvalidUrl("URL cannot be empty".to_string()));
    }

    Url::parse(trimmed).map_err(|e| TabError::InvalidUrl(format!("{trimmed}: {e}")))?;
    Ok(trimmed.to_string())
}
