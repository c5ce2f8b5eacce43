use chrono::{DateTime, Utc};
use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{ColorMode, GlobalFlags, OutputFormat, ProgressMode};
pub use root_commands::Commands;

/// Top-level CLI parser for the `pulse` binary.
#[derive(Debug, Parser)]
#[command(
    name = "pulse",
    version,
    about = "Pulse - recent activity across your code-forge organizations"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Table colors: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorMode,

    /// Progress indicators: auto, on, off
    #[arg(long, global = true, default_value = "auto")]
    pub progress: ProgressMode,

    /// Evaluate the age filter against this instant (RFC 3339) instead of now
    #[arg(long, global = true, value_name = "RFC3339")]
    pub now: Option<DateTime<Utc>>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            color: self.color,
            progress: self.progress,
            now: self.now,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use clap::{CommandFactory, Parser};

    use super::*;

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["pulse", "--format", "table", "--verbose", "summary"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Summary(_)));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["pulse", "groups", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Groups));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["pulse", "--format", "xml", "summary"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn now_flag_parses_rfc3339() {
        let cli = Cli::try_parse_from(["pulse", "--now", "2015-06-10T12:00:00Z", "summary"])
            .expect("cli should parse");
        let flags = cli.global_flags();
        assert_eq!(
            flags.now(),
            Utc.with_ymd_and_hms(2015, 6, 10, 12, 0, 0).unwrap()
        );

        assert!(Cli::try_parse_from(["pulse", "--now", "yesterday", "summary"]).is_err());
    }

    #[test]
    fn color_and_progress_default_to_auto() {
        let flags = Cli::try_parse_from(["pulse", "summary"])
            .expect("cli should parse")
            .global_flags();
        assert_eq!(flags.color, ColorMode::Auto);
        assert_eq!(flags.progress, ProgressMode::Auto);
        assert!(flags.now.is_none());
    }
}
