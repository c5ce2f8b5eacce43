use pulse_forge::CredentialStore;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Serialize)]
struct AuthLogoutResponse {
    cleared: bool,
    note: Option<&'static str>,
}

pub fn handle(flags: &GlobalFlags) -> anyhow::Result<()> {
    CredentialStore::open()?.delete()?;
    let note = std::env::var(pulse_forge::credentials::TOKEN_ENV)
        .is_ok_and(|t| !t.is_empty())
        .then_some("PULSE_FORGE__TOKEN is still set in the environment");
    output(
        &AuthLogoutResponse {
            cleared: true,
            note,
        },
        flags.format,
    )
}
