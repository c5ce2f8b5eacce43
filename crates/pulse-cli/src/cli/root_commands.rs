use clap::{Args, Subcommand};

use crate::cli::subcommands::filter::FilterArgs;
use crate::cli::subcommands::{AuthCommands, FilterCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Forge token management.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// List organizations and the user account.
    Groups,
    /// List repositories of one group.
    Repos(ReposArgs),
    /// List activities of one repository.
    Activities(ActivitiesArgs),
    /// Query everything and print the summarized tree.
    Dashboard(DashboardArgs),
    /// Show or change the persisted filter.
    Filter {
        #[command(subcommand)]
        action: FilterCommands,
    },
    /// Print only the global summary.
    Summary(SummaryArgs),
}

/// Arguments for `pulse repos`.
#[derive(Clone, Debug, Args)]
pub struct ReposArgs {
    /// Organization or user login.
    pub group: String,
    /// Include repositories hidden by the starred filter.
    #[arg(long)]
    pub all: bool,
}

/// Arguments for `pulse activities`.
#[derive(Clone, Debug, Args)]
pub struct ActivitiesArgs {
    /// Repository as `owner/name`.
    pub repo: String,
    /// Include activities older than the age filter.
    #[arg(long)]
    pub all: bool,
}

/// Arguments for `pulse dashboard`.
#[derive(Clone, Debug, Args)]
pub struct DashboardArgs {
    /// Restrict to these groups (repeatable).
    #[arg(long = "group", value_name = "LOGIN")]
    pub groups: Vec<String>,
    /// Include individual activities under each repository.
    #[arg(long)]
    pub activities: bool,
    /// Include groups, repositories and activities hidden by the filter.
    #[arg(long)]
    pub all: bool,
    /// Override the stored filter for this run.
    #[command(flatten)]
    pub filter: FilterArgs,
}

/// Arguments for `pulse summary`.
#[derive(Clone, Debug, Args)]
pub struct SummaryArgs {
    /// Override the stored filter for this run.
    #[command(flatten)]
    pub filter: FilterArgs,
}
