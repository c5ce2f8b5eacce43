use anyhow::Context;
use pulse_config::PulseConfig;
use pulse_forge::{CredentialStore, ForgeClient, TokenSource};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthLoginArgs;
use crate::output::output;
use crate::progress::Progress;

#[derive(Serialize)]
struct AuthLoginResponse {
    authenticated: bool,
    login: String,
    name: Option<String>,
    stored_in: TokenSource,
}

/// Verify the token against `GET /user` before storing it.
pub async fn handle(
    args: &AuthLoginArgs,
    flags: &GlobalFlags,
    config: &PulseConfig,
) -> anyhow::Result<()> {
    let token = args.token.trim();
    let client = ForgeClient::new(&config.forge, token)?;

    let spinner = Progress::spinner("verifying token");
    let user = match client.user().await {
        Ok(user) => user,
        Err(error) => {
            spinner.finish_err("login failed");
            return Err(error).context("auth login: token rejected by the forge");
        }
    };
    spinner.finish_clear();

    let stored_in = CredentialStore::open()?
        .store(token)
        .context("auth login: failed to store token")?;
    tracing::info!(login = %user.login, %stored_in, "logged in");

    output(
        &AuthLoginResponse {
            authenticated: true,
            login: user.login,
            name: user.name,
            stored_in,
        },
        flags.format,
    )
}
