//! Dispatcher settings
//!
//! Stores request defaults in a plain JSON file. A missing file means
//! defaults; a file may set any subset of the keys.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::FormResult;

/// Default `Accept` header sent with every request
pub const DEFAULT_ACCEPT: &str = "application/json, text/plain, */*";

/// Default `User-Agent` header sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("tryout/", env!("CARGO_PKG_VERSION"));

/// Request defaults applied by the dispatcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Settings file version
    pub version: u32,
    /// `User-Agent` unless a header field overrides it
    pub user_agent: String,
    /// `Accept` unless a header field overrides it
    pub accept: String,
    /// Whole-request timeout; unset leaves the HTTP client's own behavior
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: 1,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            request_timeout_secs: None,
        }
    }
}

/// Settings manager
pub struct SettingsManager {
    settings_file: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Load settings from `path`, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> FormResult<Self> {
        let settings = Self::load_from_file(path)?;

        Ok(Self {
            settings_file: path.to_path_buf(),
            settings,
        })
    }

    fn load_from_file(path: &Path) -> FormResult<Settings> {
        if !path.exists() {
            debug!("No settings file at {:?}, using defaults", path);
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents)?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    pub fn path(&self) -> &Path {
        &self.settings_file
    }

    /// Get current settings
    pub fn get(&self) -> &Settings {
        &self.settings
    }

    pub fn into_settings(self) -> Settings {
        self.settings
    }
}
