//! Configuration management.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Remote service endpoints and OAuth2 identifiers.
///
/// The defaults are the fixed values the Škola Online mobile API expects;
/// the config file only exists to point a build at a test deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the solapi REST service, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// OAuth2 client identifier sent with the password grant.
    #[serde(default = "default_client_id")]
    pub client_id: String,
    /// OAuth2 scope set requested at login.
    #[serde(default = "default_scope")]
    pub scope: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            client_id: default_client_id(),
            scope: default_scope(),
        }
    }
}

fn default_base_url() -> String {
    "https://aplikace.skolaonline.cz/solapi/api".to_string()
}

fn default_client_id() -> String {
    "test_client".to_string()
}

fn default_scope() -> String {
    "openid offline_access profile sol_api".to_string()
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Max characters of message body shown in the messages table.
    #[serde(default = "default_message_preview")]
    pub message_preview: usize,
    /// Max characters of homework description shown in the homework table.
    #[serde(default = "default_homework_preview")]
    pub homework_preview: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            message_preview: default_message_preview(),
            homework_preview: default_homework_preview(),
        }
    }
}

fn default_message_preview() -> usize {
    50
}

fn default_homework_preview() -> usize {
    60
}

impl Config {
    /// Load configuration from the default location, falling back to defaults.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if config_path.exists() {
            Self::from_file(&config_path.to_string_lossy())
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: &str) -> Result<Self> {
        let expanded = expand_path(path);
        let content = std::fs::read_to_string(&expanded)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the default config path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("skola-tui")
            .join("config.toml")
    }
}

/// Expand ~ to home directory.
fn expand_path(path: &str) -> String {
    if path.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(&path[2..]).to_string_lossy().to_string();
        }
    }
    path.to_string()
}
