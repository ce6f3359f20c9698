//! Client settings
//!
//! Settings are read from YAML, overridden from the environment, and turned
//! into a [`HelixClientConfig`].
//!
//! ```yaml
//! base_url: https://api.twitch.tv/helix
//! client_id: abc123
//! token: xyz789
//! timeout_secs: 10
//! max_retries: 2
//! backoff:
//!   type: exponential
//!   initial_ms: 200
//!   max_ms: 30000
//! rate_limit:
//!   requests_per_second: 13
//!   burst_size: 20
//! ```
//!
//! `points_per_minute: 800` is a shorthand that replaces `rate_limit` with a
//! bucket derived from the app's per-minute quota.

use crate::error::{Error, Result, ResultExt};
use crate::http::{HelixClientConfig, RateLimiterConfig, DEFAULT_BASE_URL};
use crate::types::{BackoffType, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Environment variable overriding `client_id`
pub const ENV_CLIENT_ID: &str = "HELIX_CLIENT_ID";
/// Environment variable overriding `token`
pub const ENV_TOKEN: &str = "HELIX_TOKEN";
/// Environment variable overriding `base_url`
pub const ENV_BASE_URL: &str = "HELIX_BASE_URL";

/// Settings for building a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Base URL for API requests
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Application client id
    #[serde(default)]
    pub client_id: Option<String>,

    /// OAuth access token
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for throttled or failed requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff between retries
    #[serde(default)]
    pub backoff: BackoffSettings,

    /// Local rate limiting; `null` disables it
    #[serde(default = "default_rate_limit")]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Per-minute point quota; takes precedence over `rate_limit`
    #[serde(default)]
    pub points_per_minute: Option<u32>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_rate_limit() -> Option<RateLimiterConfig> {
    Some(RateLimiterConfig::default())
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            client_id: None,
            token: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff: BackoffSettings::default(),
            rate_limit: default_rate_limit(),
            points_per_minute: None,
        }
    }
}

/// Backoff configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffSettings {
    /// Backoff type
    #[serde(rename = "type", default)]
    pub backoff_type: BackoffType,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

fn default_initial_ms() -> u64 {
    100
}

fn default_max_ms() -> u64 {
    60_000
}

impl Default for BackoffSettings {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::default(),
            initial_ms: default_initial_ms(),
            max_ms: default_max_ms(),
        }
    }
}

impl ClientSettings {
    /// Parse settings from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        debug!(path = %path.display(), "Loading client settings");
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml_str(&yaml)
    }

    /// Override fields from `HELIX_*` environment variables
    #[must_use]
    pub fn apply_env(self) -> Self {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    /// Override fields from any variable source; empty values are ignored
    #[must_use]
    pub fn apply_vars<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(client_id) = lookup(ENV_CLIENT_ID).none_if_empty() {
            self.client_id = Some(client_id);
        }
        if let Some(token) = lookup(ENV_TOKEN).none_if_empty() {
            self.token = Some(token);
        }
        if let Some(base_url) = lookup(ENV_BASE_URL).none_if_empty() {
            self.base_url = base_url;
        }
        self
    }

    /// Check that the settings can produce a working client
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be greater than 0"));
        }
        if self.points_per_minute == Some(0) {
            return Err(Error::config("points_per_minute must be greater than 0"));
        }
        if self.backoff.initial_ms > self.backoff.max_ms {
            return Err(Error::config("backoff.initial_ms exceeds backoff.max_ms"));
        }
        Ok(())
    }

    /// Build the HTTP client configuration
    pub fn into_client_config(self) -> Result<HelixClientConfig> {
        self.validate()?;

        let mut builder = HelixClientConfig::builder()
            .base_url(self.base_url)
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_retries(self.max_retries)
            .backoff(
                self.backoff.backoff_type,
                Duration::from_millis(self.backoff.initial_ms),
                Duration::from_millis(self.backoff.max_ms),
            );

        let rate_limit = match self.points_per_minute {
            Some(points) => Some(RateLimiterConfig::per_minute(points)),
            None => self.rate_limit,
        };
        builder = match rate_limit {
            Some(rate_limit) => builder.rate_limit(rate_limit),
            None => builder.no_rate_limit(),
        };
        if let Some(client_id) = self.client_id {
            builder = builder.client_id(client_id);
        }
        if let Some(token) = self.token {
            builder = builder.bearer_token(token);
        }

        Ok(builder.build())
    }
}
