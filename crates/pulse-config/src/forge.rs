//! Forge API configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_provider_name() -> String {
    "GitHub".to_string()
}

fn default_user_agent() -> String {
    format!("pulse/{}", env!("CARGO_PKG_VERSION"))
}

/// Default request timeout in seconds.
const fn default_timeout_secs() -> u64 {
    10
}

/// Default number of repositories queried concurrently.
const fn default_concurrency() -> usize {
    4
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForgeConfig {
    /// REST API base URL (GitHub Enterprise instances use `https://host/api/v3`).
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Display name of the provider on the dashboard.
    #[serde(default = "default_provider_name")]
    pub provider_name: String,

    /// Personal access token. Usually supplied via `PULSE_FORGE__TOKEN` or
    /// `pulse auth login` rather than a config file.
    #[serde(default)]
    pub token: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of repositories whose activities are fetched at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            provider_name: default_provider_name(),
            token: String::new(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            concurrency: default_concurrency(),
        }
    }
}

impl ForgeConfig {
    /// Check if a token is available from configuration.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.token.is_empty()
    }

    /// Validate values that would otherwise fail late at request time.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a non-HTTP API URL, a zero
    /// timeout or a zero concurrency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "forge.api_url".into(),
                reason: format!("'{}' is not an http(s) URL", self.api_url),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "forge.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "forge.concurrency".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// API base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}
