use clap::{Args, Subcommand};
use pulse_core::Filter;

/// Filter commands.
#[derive(Clone, Debug, Subcommand)]
pub enum FilterCommands {
    /// Print the current filter.
    Show,
    /// Change and persist the filter.
    Set(FilterArgs),
    /// Forget the persisted filter and return to the configured defaults.
    Reset,
}

/// Filter fields to change; unset fields keep their current value.
#[derive(Clone, Debug, Default, Args)]
pub struct FilterArgs {
    /// Only count starred repositories.
    #[arg(long, value_name = "BOOL")]
    pub starred: Option<bool>,
    /// Only count activities from the last N days; 0 disables the age filter.
    #[arg(long, value_name = "DAYS")]
    pub age_days: Option<u64>,
}

impl FilterArgs {
    /// `filter` with the given fields replaced.
    #[must_use]
    pub fn apply(&self, filter: Filter) -> Filter {
        let filter = self
            .starred
            .map_or(filter, |starred| filter.with_starred(starred));
        self.age_days
            .map_or(filter, |days| filter.with_age_days(days))
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pulse_core::filter::DAY_MS;

    use crate::cli::{Cli, Commands};

    use super::*;

    #[test]
    fn filter_set_parses_values() {
        let cli = Cli::try_parse_from([
            "pulse", "filter", "set", "--starred", "true", "--age-days", "30",
        ])
        .expect("cli should parse");
        let Commands::Filter {
            action: FilterCommands::Set(args),
        } = cli.command
        else {
            panic!("expected filter set");
        };
        assert_eq!(args.starred, Some(true));
        assert_eq!(args.age_days, Some(30));
    }

    #[test]
    fn apply_only_touches_given_fields() {
        let base = Filter::new(false, 365 * DAY_MS);
        let starred = FilterArgs {
            starred: Some(true),
            age_days: None,
        };
        assert_eq!(starred.apply(base), Filter::new(true, 365 * DAY_MS));

        let age = FilterArgs {
            starred: None,
            age_days: Some(0),
        };
        assert_eq!(age.apply(base), Filter::new(false, 0));
        assert_eq!(FilterArgs::default().apply(base), base);
    }

    #[test]
    fn filter_set_rejects_non_bool_starred() {
        assert!(Cli::try_parse_from(["pulse", "filter", "set", "--starred", "maybe"]).is_err());
    }
}
