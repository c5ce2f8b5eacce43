mod login;
mod logout;
mod status;

use pulse_config::PulseConfig;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;

/// Handle `pulse auth <subcommand>`.
pub async fn handle(
    action: &AuthCommands,
    flags: &GlobalFlags,
    config: &PulseConfig,
) -> anyhow::Result<()> {
    match action {
        AuthCommands::Login(args) => login::handle(args, flags, config).await,
        AuthCommands::Logout => logout::handle(flags),
        AuthCommands::Status => status::handle(flags, config).await,
    }
}
