/// Application configuration
///
/// Settings come from an optional JSON file in the user's config directory:
/// - Linux: ~/.config/fashion-studio/config.json
/// - macOS: ~/Library/Application Support/fashion-studio/config.json
/// - Windows: %APPDATA%\fashion-studio\config.json
///
/// Environment variables override the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Errors while reading the config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Key for the image-edit service
    pub api_key: Option<String>,
    /// Model used for outfit edits
    pub model: String,
    /// Base URL of the models endpoint, without a trailing slash
    pub base_url: String,
    /// HTTP timeout for a single edit request
    pub request_timeout_secs: u64,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl StudioConfig {
    /// Where the config file is expected, if a config directory exists
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fashion-studio").join("config.json"))
    }

    /// Load the config file (if present) and apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::config_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Like [`StudioConfig::load`], but a broken config file only produces a
    /// warning and defaults are used instead
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                warn!("⚠️  {}; using defaults", e);
                let mut config = Self::default();
                config.apply_env(|key| std::env::var(key).ok());
                config
            }
        }
    }

    /// Read settings from `path`. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!("📁 Loaded config from {}", path.display());
        Ok(config)
    }

    /// Override fields from environment variables found through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(model) = non_empty("FASHION_STUDIO_MODEL") {
            self.model = model;
        }
        if let Some(base_url) = non_empty("FASHION_STUDIO_BASE_URL") {
            self.base_url = base_url.trim_end_matches('/').to_string();
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }
}

// Keep the key out of logs
impl std::fmt::Debug for StudioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudioConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}
