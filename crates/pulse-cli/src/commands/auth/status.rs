use pulse_config::PulseConfig;
use pulse_forge::{CredentialStore, ForgeClient};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::{TokenOrigin, resolve_token};
use crate::output::output;

#[derive(Serialize)]
struct AuthStatusResponse {
    authenticated: bool,
    api_url: String,
    login: Option<String>,
    token_source: Option<TokenOrigin>,
    note: Option<String>,
}

pub async fn handle(flags: &GlobalFlags, config: &PulseConfig) -> anyhow::Result<()> {
    let store = CredentialStore::open()?;
    let mut status = AuthStatusResponse {
        authenticated: false,
        api_url: config.forge.base_url().to_string(),
        login: None,
        token_source: None,
        note: None,
    };

    match resolve_token(config, &store) {
        None => status.note = Some("no token found; run `pulse auth login --token <TOKEN>`".into()),
        Some((token, origin)) => {
            status.token_source = Some(origin);
            let user = match ForgeClient::new(&config.forge, &token) {
                Ok(client) => client.user().await,
                Err(error) => Err(error),
            };
            match user {
                Ok(user) => {
                    status.authenticated = true;
                    status.login = Some(user.login);
                }
                Err(error) => status.note = Some(error.to_string()),
            }
        }
    }

    output(&status, flags.format)
}
