use pulse_config::{FilterStore, PulseConfig};
use pulse_core::Filter;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::FilterCommands;
use crate::context::{current_filter, open_filter_store};
use crate::output::output;

#[derive(Debug, Serialize)]
struct FilterResponse {
    starred: bool,
    age_days: u64,
    age_ms: u64,
    since: Option<String>,
    persisted: bool,
    store_path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    changed: Vec<&'static str>,
}

/// Handle `pulse filter <subcommand>`.
pub fn handle(
    action: &FilterCommands,
    flags: &GlobalFlags,
    config: &PulseConfig,
) -> anyhow::Result<()> {
    let store = open_filter_store(config)?;
    let response = match action {
        FilterCommands::Show => {
            let filter = current_filter(config, &store);
            respond(&store, filter, flags, Vec::new())
        }
        FilterCommands::Set(args) => {
            let previous = current_filter(config, &store);
            let filter = args.apply(previous);
            store.persist(&filter)?;
            let change = previous.diff(&filter);
            let mut changed = Vec::new();
            if change.starred {
                changed.push("starred");
            }
            if change.age {
                changed.push("age");
            }
            respond(&store, filter, flags, changed)
        }
        FilterCommands::Reset => {
            store.clear()?;
            respond(&store, config.filter.default_filter(), flags, Vec::new())
        }
    };
    output(&response, flags.format)
}

fn respond(
    store: &FilterStore,
    filter: Filter,
    flags: &GlobalFlags,
    changed: Vec<&'static str>,
) -> FilterResponse {
    FilterResponse {
        starred: filter.starred,
        age_days: filter.age_days(),
        age_ms: filter.age_ms,
        since: filter.since(flags.now()).map(|s| s.to_rfc3339()),
        persisted: store.path().exists(),
        store_path: store.path().display().to_string(),
        changed,
    }
}
