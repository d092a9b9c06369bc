//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::Identity;

/// Environment variable overriding `api.key`.
pub const API_KEY_ENV: &str = "ROOTME_API_KEY";

/// Environment variable overriding `webhook.url`.
pub const WEBHOOK_URL_ENV: &str = "WEBHOOK_URL";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Tracked users, as `name[:id[:slug]]`
    #[serde(default)]
    pub users: Vec<String>,

    /// Challenge API access
    #[serde(default)]
    pub api: ApiConfig,

    /// Webhook target and message appearance
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// Snapshot cache location
    #[serde(default)]
    pub cache: CacheConfig,

    /// HTTP client behavior
    #[serde(default)]
    pub http: HttpConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Override secrets with values from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Override secrets using the given variable lookup.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.api.key = key;
        }
        if let Some(url) = lookup(WEBHOOK_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.webhook.url = url;
        }
    }

    /// Parse the configured users.
    pub fn identities(&self) -> Result<Vec<Identity>> {
        self.users.iter().map(|u| u.parse()).collect()
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.key.trim().is_empty() {
            return Err(AppError::validation(format!(
                "api.key is empty (set it in config or {API_KEY_ENV})"
            )));
        }
        Url::parse(&self.api.base_url)
            .map_err(|e| AppError::validation(format!("api.base_url is invalid: {e}")))?;
        Url::parse(&self.api.site_url)
            .map_err(|e| AppError::validation(format!("api.site_url is invalid: {e}")))?;
        if self.webhook.url.trim().is_empty() {
            return Err(AppError::validation(format!(
                "webhook.url is empty (set it in config or {WEBHOOK_URL_ENV})"
            )));
        }
        Url::parse(&self.webhook.url)
            .map_err(|e| AppError::validation(format!("webhook.url is invalid: {e}")))?;
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.users.is_empty() {
            return Err(AppError::validation("No users defined"));
        }
        self.identities()?;
        Ok(())
    }
}

/// Challenge API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API key sent as the `api_key` cookie
    #[serde(default)]
    pub key: String,

    /// API root
    #[serde(default = "defaults::api_base_url")]
    pub base_url: String,

    /// Public site root used for profile links and avatars
    #[serde(default = "defaults::site_url")]
    pub site_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            base_url: defaults::api_base_url(),
            site_url: defaults::site_url(),
        }
    }
}

/// Webhook target and message appearance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Webhook execute URL
    #[serde(default)]
    pub url: String,

    /// Thread receiving new-solve notifications; none disables them
    #[serde(default)]
    pub thread_id: Option<String>,

    #[serde(default = "defaults::username")]
    pub username: String,

    #[serde(default = "defaults::avatar_url")]
    pub avatar_url: String,

    /// Leaderboard embed title
    #[serde(default = "defaults::title")]
    pub title: String,

    /// Leaderboard embed color
    #[serde(default = "defaults::color")]
    pub color: u32,

    /// Leaderboard embed image; empty disables it
    #[serde(default = "defaults::image_url")]
    pub image_url: String,

    #[serde(default = "defaults::footer")]
    pub footer: String,
}

impl WebhookConfig {
    /// Thread id, ignoring blank values.
    pub fn thread(&self) -> Option<&str> {
        self.thread_id
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            thread_id: None,
            username: defaults::username(),
            avatar_url: defaults::avatar_url(),
            title: defaults::title(),
            color: defaults::color(),
            image_url: defaults::image_url(),
            footer: defaults::footer(),
        }
    }
}

/// Snapshot cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "defaults::cache_path")]
    pub path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: defaults::cache_path(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // API defaults
    pub fn api_base_url() -> String {
        "https://api.www.root-me.org".into()
    }
    pub fn site_url() -> String {
        "https://www.root-me.org".into()
    }

    // Webhook defaults
    pub fn username() -> String {
        "RootMe Leaderboard".into()
    }
    pub fn avatar_url() -> String {
        "https://images.seeklogo.com/logo-png/50/1/root-me-logo-png_seeklogo-505083.png".into()
    }
    pub fn title() -> String {
        "🏆 RootMe Leaderboard".into()
    }
    pub fn color() -> u32 {
        45300
    }
    pub fn image_url() -> String {
        "https://picsum.photos/400/200".into()
    }
    pub fn footer() -> String {
        "Made with 𖹭 by rootboard".into()
    }

    // Cache defaults
    pub fn cache_path() -> PathBuf {
        PathBuf::from("cache.json")
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        concat!("rootboard/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        30
    }
}
