use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";
/// Environment variable overriding the settings file location.
pub const SETTINGS_ENV: &str = "BOOKMARK_POPUP_SETTINGS";
pub const DEFAULT_SEARCH_ENGINE: &str = "https://www.google.com/search?q=";

fn default_include_history() -> bool {
    true
}

fn default_search_engine() -> String {
    DEFAULT_SEARCH_ENGINE.to_string()
}

fn default_window_size() -> Option<(i32, i32)> {
    Some((420, 480))
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Chromium `Bookmarks` file. If `None`, the default profile is used.
    #[serde(default)]
    pub bookmarks_file: Option<String>,
    /// Chromium `History` database. If `None`, the file next to the
    /// bookmarks file is used.
    #[serde(default)]
    pub history_file: Option<String>,
    /// Append frequently visited URLs after the bookmarks.
    #[serde(default = "default_include_history")]
    pub include_history: bool,
    /// Prefix of the web search URL used when nothing matches the query.
    #[serde(default = "default_search_engine")]
    pub search_engine: String,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Also write logs to this file.
    #[serde(default)]
    pub log_file: Option<String>,
    #[serde(default = "default_window_size")]
    pub window_size: Option<(i32, i32)>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bookmarks_file: None,
            history_file: None,
            include_history: default_include_history(),
            search_engine: default_search_engine(),
            debug_logging: false,
            log_file: None,
            window_size: default_window_size(),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Location of the settings file, honouring [`SETTINGS_ENV`].
    pub fn path() -> String {
        std::env::var(SETTINGS_ENV).unwrap_or_else(|_| DEFAULT_SETTINGS_FILE.to_string())
    }

    pub fn bookmarks_path(&self) -> PathBuf {
        match &self.bookmarks_file {
            Some(p) => PathBuf::from(p),
            None => default_profile_dir().join("Bookmarks"),
        }
    }

    pub fn history_path(&self) -> PathBuf {
        match &self.history_file {
            Some(p) => PathBuf::from(p),
            None => self
                .bookmarks_path()
                .parent()
                .map(|dir| dir.join("History"))
                .unwrap_or_else(|| PathBuf::from("History")),
        }
    }
}

/// Default Chrome profile directory for the current platform.
fn default_profile_dir() -> PathBuf {
    let base = if cfg!(target_os = "windows") {
        dirs_next::data_local_dir().map(|d| d.join("Google").join("Chrome").join("User Data"))
    } else if cfg!(target_os = "macos") {
        dirs_next::data_dir().map(|d| d.join("Google").join("Chrome"))
    } else {
        dirs_next::config_dir().map(|d| d.join("google-chrome"))
    };
    base.unwrap_or_default().join("Default")
}
