//! Configuration types for the helpdesk widget.
//!
//! This module defines where the assistant service lives and how the
//! controller treats responses that arrive after the log was cleared.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable that overrides [`WidgetConfig::base_url`].
pub const BASE_URL_ENV: &str = "HELPDESK_BASE_URL";

/// Main configuration for the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Origin of the assistant service (scheme, host and port).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the chat endpoint, relative to `base_url`.
    #[serde(default = "default_chat_path")]
    pub chat_path: String,

    /// Path of the health endpoint, relative to `base_url`.
    #[serde(default = "default_health_path")]
    pub health_path: String,

    /// Optional request timeout. Requests never time out when unset.
    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,

    /// What to do with a reply whose request predates the last clear.
    #[serde(default)]
    pub stale_responses: StaleResponsePolicy,
}

fn default_base_url() -> String {
    "http://localhost:8000".into()
}

fn default_chat_path() -> String {
    "/api/chat".into()
}

fn default_health_path() -> String {
    "/api/health".into()
}

/// Handling of replies that settle after [`clear`](crate::Controller::clear).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StaleResponsePolicy {
    /// Append the reply and adopt its session id, even into a cleared log.
    #[default]
    Apply,
    /// Drop the reply; only the pending flag is reset.
    Discard,
}

impl WidgetConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load from `path` if it exists, otherwise start from defaults.
    /// `HELPDESK_BASE_URL` is applied on top in both cases.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::load(path)?
        } else {
            Self::default()
        };
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                config.base_url = base_url;
            }
        }
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Full URL of the chat endpoint.
    pub fn chat_url(&self) -> String {
        join_url(&self.base_url, &self.chat_path)
    }

    /// Full URL of the health endpoint.
    pub fn health_url(&self) -> String {
        join_url(&self.base_url, &self.health_path)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs)
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat_path: default_chat_path(),
            health_path: default_health_path(),
            request_timeout_seconds: None,
            stale_responses: StaleResponsePolicy::default(),
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}
