use pulse_config::PulseConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
///
/// `auth` and `filter` work without a forge token; every other command
/// builds an [`AppContext`] first.
pub async fn dispatch(
    command: Commands,
    config: PulseConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Auth { action } => commands::auth::handle(&action, flags, &config).await,
        Commands::Filter { action } => commands::filter::handle(&action, flags, &config),
        Commands::Groups => {
            let ctx = AppContext::init(config, flags)?;
            commands::groups::handle(&ctx, flags).await
        }
        Commands::Repos(args) => {
            let ctx = AppContext::init(config, flags)?;
            commands::repos::handle(&args, &ctx, flags).await
        }
        Commands::Activities(args) => {
            let ctx = AppContext::init(config, flags)?;
            commands::activities::handle(&args, &ctx, flags).await
        }
        Commands::Dashboard(args) => {
            let ctx = AppContext::init(config, flags)?;
            commands::dashboard::handle(&args, &ctx, flags).await
        }
        Commands::Summary(args) => {
            let ctx = AppContext::init(config, flags)?;
            commands::summary::handle(&args, &ctx, flags).await
        }
    }
}
