//! Application configuration.
//!
//! Configuration is stored in `.joinmatch/config.yaml` and includes:
//! - Backend base URL and request timeout
//! - Session token and current user id
//! - Page size and search debounce window

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{JoinMatchError, Result};

/// Default configuration directory, relative to the working directory.
pub const CONFIG_DIR: &str = ".joinmatch";

/// Directory holding `config.yaml`, overridable with `JOINMATCH_ROOT`.
pub fn config_root() -> PathBuf {
    if let Ok(root) = env::var("JOINMATCH_ROOT")
        && !root.is_empty()
    {
        return PathBuf::from(root);
    }
    PathBuf::from(CONFIG_DIR)
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend base URL (default: http://localhost:8080)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Session credentials
    #[serde(default)]
    pub auth: AuthConfig,

    /// Items requested per page (default: 20)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Quiet period before a search is sent, in milliseconds (default: 300)
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_page_size() -> u32 {
    20
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            auth: AuthConfig::default(),
            page_size: default_page_size(),
            search_debounce_ms: default_search_debounce_ms(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// Session credentials
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .finish()
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        config_root().join("config.yaml")
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(JoinMatchError::Config(
                "page_size must be greater than zero".to_string(),
            ));
        }
        Url::parse(&self.api_url).map_err(|e| {
            JoinMatchError::Config(format!("invalid api_url '{}': {e}", self.api_url))
        })?;
        Ok(())
    }

    /// Backend URL from `JOINMATCH_API_URL` or the config file
    pub fn api_url(&self) -> String {
        if let Ok(url) = env::var("JOINMATCH_API_URL")
            && !url.is_empty()
        {
            return url;
        }
        self.api_url.clone()
    }

    /// Session token from `JOINMATCH_TOKEN` or the config file
    pub fn auth_token(&self) -> Option<String> {
        if let Ok(token) = env::var("JOINMATCH_TOKEN")
            && !token.is_empty()
        {
            return Some(token);
        }
        self.auth.token.clone()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.page_size, 20);
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.auth.token.is_none());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: Config = serde_yaml_ng::from_str("page_size: 5\n").unwrap();
        assert_eq!(config.page_size, 5);
        assert_eq!(config.search_debounce_ms, 300);
        assert_eq!(config.api_url, "http://localhost:8080");
    }

    #[test]
    fn test_validate() {
        let config = Config {
            page_size: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            api_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_auth_debug_redacted() {
        let auth = AuthConfig {
            token: Some("secret-jwt".to_string()),
            user_id: Some(9),
            username: None,
        };
        let debug = format!("{auth:?}");
        assert!(!debug.contains("secret-jwt"));
        assert!(debug.contains("[REDACTED]"));
    }
}
