//! # pulse-forge
//!
//! REST client for a GitHub-compatible code forge.
//!
//! Endpoint wrappers live in per-resource modules (`user`, `groups`, `repos`,
//! `activities`), each adding methods to [`ForgeClient`]. The `query_*`
//! methods turn raw responses into the `pulse-core` records the dashboard
//! consumes. Every list request fetches a single page of up to 100 items.

pub mod activities;
pub mod credentials;
pub mod groups;
pub mod repos;
pub mod user;

mod error;
mod http;

pub use credentials::{CredentialStore, TokenSource};
pub use error::ForgeError;
pub use user::ForgeUser;

use std::time::Duration;

use pulse_config::ForgeConfig;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};

const ACCEPT_JSON: &str = "application/vnd.github+json";

/// Authenticated HTTP client for one forge account.
#[derive(Debug, Clone)]
pub struct ForgeClient {
    http: reqwest::Client,
    base_url: String,
}

impl ForgeClient {
    /// Build a client from `[forge]` settings and a personal access token.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::NotAuthenticated`] for an empty token,
    /// [`ForgeError::Credentials`] if the token is not a valid header value
    /// and [`ForgeError::Http`] if the underlying client fails to build.
    pub fn new(config: &ForgeConfig, token: &str) -> Result<Self, ForgeError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ForgeError::NotAuthenticated);
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ForgeError::Credentials("token contains invalid characters".into()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path` (relative to the API base) and decode the JSON body.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ForgeError> {
        let url = self.url(path);
        tracing::debug!(%url, "forge request");
        let resp = http::ensure_success(self.http.get(&url).send().await?).await?;
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ForgeError::Parse(format!("{path}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_empty_token() {
        let err = ForgeClient::new(&ForgeConfig::default(), "  ").unwrap_err();
        assert!(matches!(err, ForgeError::NotAuthenticated));
    }

    #[test]
    fn new_rejects_token_with_newline() {
        let err = ForgeClient::new(&ForgeConfig::default(), "abc\ndef").unwrap_err();
        assert!(matches!(err, ForgeError::Credentials(_)));
    }

    #[test]
    fn url_joins_base_without_double_slash() {
        let config = ForgeConfig {
            api_url: "https://ghe.example.com/api/v3/".into(),
            ..Default::default()
        };
        let client = ForgeClient::new(&config, "ghp_123").unwrap();
        assert_eq!(client.base_url(), "https://ghe.example.com/api/v3");
        assert_eq!(client.url("/user"), "https://ghe.example.com/api/v3/user");
    }
}
