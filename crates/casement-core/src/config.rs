//! Shell configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use casement_session::DEFAULT_TAB_TITLE;

use crate::platform::Platform;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the settings database holding saved tabs
    pub database_path: PathBuf,
    /// Launch arguments are honored as a starting URL only when they
    /// mention one of these sites
    pub launch_url_hosts: Vec<String>,
    /// Title stored for tabs that never reported one
    pub default_tab_title: String,
    /// Which last-window convention to follow
    pub platform: Platform,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("casement.db"),
            launch_url_hosts: vec!["casement.app".to_string()],
            default_tab_title: DEFAULT_TAB_TITLE.to_string(),
            platform: Platform::current(),
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Casement"))
            .unwrap_or_else(|| PathBuf::from(".casement"))
    }

    pub fn config_path() -> PathBuf {
        Self::data_dir().join("config.json")
    }

    /// Load a JSON config file. A missing file yields the defaults; fields
    /// absent from the file keep their default values.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file; using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;

        tracing::info!(
            path = %path.display(),
            platform = %config.platform,
            "Loaded configuration"
        );

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

// Per-OS local data directory
mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}
