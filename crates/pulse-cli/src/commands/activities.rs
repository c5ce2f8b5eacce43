use anyhow::Context;
use pulse_core::{ActivitySummary, repository::split_full_name};
use pulse_rollup::{ActivityEntry, ActivityList};
use serde::Serialize;

use crate::cli::root_commands::ActivitiesArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

#[derive(Serialize)]
struct ActivitiesResponse<'a> {
    full_name: &'a str,
    since: Option<String>,
    activity_summary: ActivitySummary,
    matched_activity_summary: ActivitySummary,
    activities: Vec<&'a ActivityEntry>,
}

pub async fn handle(
    args: &ActivitiesArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    split_full_name(&args.repo)?;
    let since = if args.all {
        None
    } else {
        ctx.filter.since(ctx.now)
    };

    let spinner = Progress::spinner(&format!("querying activities of {}", args.repo));
    let activities = ctx
        .client
        .try_query_activities(&args.repo, since)
        .await
        .with_context(|| format!("activities of '{}' not loaded", args.repo))?;
    spinner.finish_clear();

    let mut list = ActivityList::new();
    list.set(activities, &ctx.filter, ctx.now);
    let entries = list
        .iter()
        .filter(|entry| args.all || entry.matches_filter)
        .collect::<Vec<_>>();

    if flags.format == OutputFormat::Table {
        return output(&entries, flags.format);
    }
    output(
        &ActivitiesResponse {
            full_name: &args.repo,
            since: since.map(|s| s.to_rfc3339()),
            activity_summary: list.summary(),
            matched_activity_summary: list.matched_summary(),
            activities: entries,
        },
        flags.format,
    )
}
