//! Configuration management
//!
//! Layers, later ones winning: built-in defaults, an optional YAML file,
//! environment variables, then command-line overrides. The bot token is
//! never read from or written to the file.

use std::path::Path;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::application::errors::ConfigError;
use crate::domain::entities::MiniAppUrl;

/// Environment variable holding the bot token
pub const TOKEN_ENV: &str = "BOT_TOKEN";
/// Environment variable overriding the mini-app base URL
pub const MINI_APP_URL_ENV: &str = "MINI_APP_URL";

const DEFAULT_MINI_APP_URL: &str = "https://farrukhburiev.github.io/offline_games/";

/// Longest long-poll timeout Telegram accepts
pub const MAX_POLL_TIMEOUT_SECONDS: u64 = 50;
/// Upper bound for `polling.max-backoff-seconds`
pub const MAX_BACKOFF_SECONDS: u64 = 3600;

/// Bot configuration
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub bot: BotSection,
    #[serde(default)]
    pub mini_app: MiniAppSection,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(skip)]
    token: Option<SecretString>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotSection {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MiniAppSection {
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PollingConfig {
    /// Long-poll timeout passed to getUpdates
    pub timeout_seconds: u64,
    /// Upper bound for the delay between failed polls
    pub max_backoff_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TelegramConfig {
    pub api_base: String,
}

impl Default for BotSection {
    fn default() -> Self {
        Self {
            name: "offline-games-bot".to_string(),
        }
    }
}

impl Default for MiniAppSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MINI_APP_URL.to_string(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            max_backoff_seconds: 30,
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.telegram.org".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotSection::default(),
            mini_app: MiniAppSection::default(),
            polling: PollingConfig::default(),
            telegram: TelegramConfig::default(),
            token: None,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config {}: {}", path.display(), e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Load the file if it exists, then apply the process environment
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = if path.exists() {
            Self::load(path)?
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };

        Ok(config.with_env(|key| std::env::var(key).ok()))
    }

    /// Apply environment overrides read through `lookup`
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(TOKEN_ENV).filter(|t| !t.trim().is_empty()) {
            self.token = Some(SecretString::from(token.trim().to_string()));
        }

        if let Some(url) = lookup(MINI_APP_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.mini_app.base_url = url;
        }

        self
    }

    /// Command-line token, taking precedence over the environment
    pub fn with_token(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.token = Some(SecretString::from(token.trim().to_string()));
        }
        self
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// The bot token; absence is fatal at startup
    pub fn token(&self) -> Result<&SecretString, ConfigError> {
        self.token
            .as_ref()
            .ok_or_else(|| ConfigError::MissingField(TOKEN_ENV.to_string()))
    }

    pub fn mini_app_url(&self) -> Result<MiniAppUrl, ConfigError> {
        MiniAppUrl::parse(&self.mini_app.base_url)
    }

    /// Check everything the serve loop needs before it starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.token()?;
        self.mini_app_url()?;

        if self.polling.timeout_seconds > MAX_POLL_TIMEOUT_SECONDS {
            return Err(ConfigError::InvalidValue(format!(
                "polling.timeout-seconds must be at most {}",
                MAX_POLL_TIMEOUT_SECONDS
            )));
        }

        if !(1..=MAX_BACKOFF_SECONDS).contains(&self.polling.max_backoff_seconds) {
            return Err(ConfigError::InvalidValue(format!(
                "polling.max-backoff-seconds must be between 1 and {}",
                MAX_BACKOFF_SECONDS
            )));
        }

        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }
}
