//! Saved tab record

use serde::{Deserialize, Serialize};

/// Durable form of one open tab, restored on the next launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedTabRecord {
    pub url: String,
    pub title: String,
}

impl SavedTabRecord {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}
