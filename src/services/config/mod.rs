// Configuration service
// Loads and persists the dashboard config as a TOML file under the
// platform config directory

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the booking backend, e.g. "http://localhost:8000/api"
    pub api_base_url: String,
    /// Restaurant to scope table queries to, when the backend hosts several
    pub restaurant_id: Option<i64>,
    /// Whether the view window follows the live clock on startup
    pub live_tracking: bool,
    /// Default duration offered by the creation handoff, in minutes
    pub default_duration_minutes: i64,
    pub theme: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            restaurant_id: None,
            live_tracking: true,
            default_duration_minutes: 90,
            theme: "light".to_string(),
        }
    }
}

impl AppConfig {
    /// Resolve the config file path under the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "Ken24T", "table-plan")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load config from `path`, falling back to defaults when the file
    /// does not exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        toml::from_str(&raw).with_context(|| format!("Failed to parse config file {:?}", path))
    }

    /// Load from the default location, or defaults when unresolvable.
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path).unwrap_or_else(|err| {
                log::warn!("Config load failed ({err:#}), using defaults");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Persist the config as TOML, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }
        let raw = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, raw).with_context(|| format!("Failed to write config file {:?}", path))
    }
}
