//! Configuration for the extract client.
//!
//! Supports both environment variables and a YAML config file.
//! Environment variables take precedence over config file values.

use crate::error::{Result, WikiError};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikiConfig {
    /// Wikipedia language edition, e.g. "en".
    #[serde(default = "default_language")]
    pub language: String,

    /// Full API endpoint URL. When unset, derived from `language`.
    #[serde(default)]
    pub api_url: Option<String>,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Connect/read deadline for a single request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_user_agent() -> String {
    concat!("wiki-extract/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            api_url: None,
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Configuration file structure (YAML format).
#[derive(Debug, Deserialize)]
struct ConfigFile {
    language: Option<String>,
    api_url: Option<String>,
    user_agent: Option<String>,
    timeout_secs: Option<u64>,
}

impl WikiConfig {
    /// Load configuration from environment variables and optional config file.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (WIKI_LANGUAGE, WIKI_API_URL, WIKI_USER_AGENT,
    ///    WIKI_TIMEOUT_SECS)
    /// 2. Config file (~/.config/wiki-extract/config.yaml)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        let mut config = WikiConfig::default();

        // Try to load from config file first
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                config = Self::load_from_file(&config_path)?;
            }
        }

        // Override with environment variables
        if let Ok(language) = env::var("WIKI_LANGUAGE") {
            config.language = language;
        }

        if let Ok(api_url) = env::var("WIKI_API_URL") {
            config.api_url = Some(api_url);
        }

        if let Ok(user_agent) = env::var("WIKI_USER_AGENT") {
            config.user_agent = user_agent;
        }

        if let Ok(timeout) = env::var("WIKI_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                config.timeout_secs = secs;
            }
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| WikiError::io(path, e))?;

        let file_config: ConfigFile = serde_yaml::from_str(&content)
            .map_err(|e| WikiError::Config(format!("Failed to parse config file: {}", e)))?;

        let mut config = WikiConfig::default();

        if let Some(language) = file_config.language {
            config.language = language;
        }
        if file_config.api_url.is_some() {
            config.api_url = file_config.api_url;
        }
        if let Some(user_agent) = file_config.user_agent {
            config.user_agent = user_agent;
        }
        if let Some(timeout_secs) = file_config.timeout_secs {
            config.timeout_secs = timeout_secs;
        }

        Ok(config)
    }

    /// Get the default config file path.
    pub fn config_file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "wiki-extract")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// API endpoint URL for the configured language edition.
    pub fn endpoint(&self) -> String {
        match &self.api_url {
            Some(url) => url.clone(),
            None => format!("https://{}.wikipedia.org/w/api.php", self.language),
        }
    }

    /// Validate that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.language.is_empty() && self.api_url.is_none() {
            return Err(WikiError::Config(
                "Language is required when no API URL is set. Set WIKI_LANGUAGE or add it to the config file.".to_string(),
            ));
        }

        if self.user_agent.is_empty() {
            return Err(WikiError::Config(
                "User agent must not be empty.".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(WikiError::Config(
                "Timeout must be at least one second.".to_string(),
            ));
        }

        Ok(())
    }

    /// Create a config for a specific language edition (useful for testing).
    pub fn for_language(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            ..Default::default()
        }
    }
}
