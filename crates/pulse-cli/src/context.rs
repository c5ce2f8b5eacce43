use anyhow::Context;
use chrono::{DateTime, Utc};
use pulse_config::{FilterStore, PulseConfig};
use pulse_core::Filter;
use pulse_forge::{CredentialStore, ForgeClient, ForgeError, ForgeUser, credentials::TOKEN_ENV};
use serde::Serialize;

use crate::cli::GlobalFlags;

/// Where the active token was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenOrigin {
    Env,
    Config,
    Keyring,
    File,
}

impl From<pulse_forge::TokenSource> for TokenOrigin {
    fn from(source: pulse_forge::TokenSource) -> Self {
        match source {
            pulse_forge::TokenSource::Keyring => Self::Keyring,
            pulse_forge::TokenSource::Env => Self::Env,
            pulse_forge::TokenSource::File => Self::File,
        }
    }
}

/// Shared resources for commands that talk to the forge.
pub struct AppContext {
    pub config: PulseConfig,
    pub client: ForgeClient,
    pub filter: Filter,
    pub now: DateTime<Utc>,
}

impl AppContext {
    /// Resolve a token, build the client and restore the persisted filter.
    pub fn init(config: PulseConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let store = CredentialStore::open()?;
        let (token, origin) = resolve_token(&config, &store).ok_or(ForgeError::NotAuthenticated)?;
        tracing::debug!(?origin, "using forge token");

        let client = ForgeClient::new(&config.forge, &token)
            .context("failed to build forge client")?;
        let filter = current_filter(&config, &open_filter_store(&config)?);

        Ok(Self {
            config,
            client,
            filter,
            now: flags.now(),
        })
    }

    /// Display name of the configured provider.
    #[must_use]
    pub fn provider(&self) -> &str {
        &self.config.forge.provider_name
    }

    pub async fn current_user(&self) -> anyhow::Result<ForgeUser> {
        self.client
            .user()
            .await
            .context("failed to verify forge token")
    }
}

pub fn load_config() -> anyhow::Result<PulseConfig> {
    PulseConfig::load_with_dotenv().context("failed to load configuration")
}

/// A token from configuration (`[forge].token` or `PULSE_FORGE__TOKEN`)
/// wins over stored credentials.
pub fn resolve_token(
    config: &PulseConfig,
    store: &CredentialStore,
) -> Option<(String, TokenOrigin)> {
    if config.forge.is_configured() {
        let origin = if std::env::var(TOKEN_ENV).is_ok_and(|t| !t.is_empty()) {
            TokenOrigin::Env
        } else {
            TokenOrigin::Config
        };
        return Some((config.forge.token.clone(), origin));
    }
    store
        .load_with_source()
        .map(|(token, source)| (token, source.into()))
}

pub fn open_filter_store(config: &PulseConfig) -> anyhow::Result<FilterStore> {
    FilterStore::from_config(&config.filter).context("failed to locate the filter store")
}

/// The persisted filter, or the configured default when none is stored.
#[must_use]
pub fn current_filter(config: &PulseConfig, store: &FilterStore) -> Filter {
    store.restore_or(config.filter.default_filter())
}
