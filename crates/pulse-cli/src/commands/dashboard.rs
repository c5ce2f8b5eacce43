use pulse_core::ActivitySummary;
use pulse_rollup::{DashboardSnapshot, SnapshotOptions};
use serde::Serialize;

use crate::cli::root_commands::DashboardArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::output;
use crate::pipeline::{LoadOptions, load_dashboard};

#[derive(Serialize)]
struct DashboardResponse {
    #[serde(flatten)]
    snapshot: DashboardSnapshot,
    not_loaded: Vec<String>,
}

/// One table line per repository, counters taken from its matched summary.
#[derive(Debug, PartialEq, Eq, Serialize)]
struct DashboardRow {
    group: String,
    repository: String,
    starred: bool,
    loaded: bool,
    issues: String,
    pull_requests: String,
    comments: u64,
    commits: u64,
    tags: u64,
}

pub async fn handle(
    args: &DashboardArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let options = LoadOptions {
        groups: args.groups.clone(),
        include_hidden: args.all,
        filter: Some(args.filter.apply(ctx.filter)),
    };
    let report = load_dashboard(ctx, &options).await?;
    let snapshot = report.dashboard.snapshot(SnapshotOptions {
        include_activities: args.activities,
        only_matching: !args.all,
    });

    if flags.format == OutputFormat::Table {
        return output(&table_rows(&snapshot), flags.format);
    }
    output(
        &DashboardResponse {
            snapshot,
            not_loaded: report.not_loaded,
        },
        flags.format,
    )
}

fn table_rows(snapshot: &DashboardSnapshot) -> Vec<DashboardRow> {
    snapshot
        .groups
        .iter()
        .flat_map(|group| {
            group.repositories.iter().map(move |repo| {
                let summary = repo.matched_activity_summary.unwrap_or_default();
                DashboardRow {
                    group: group.name.clone(),
                    repository: repo.full_name.clone(),
                    starred: repo.is_starred,
                    loaded: repo.activities_queried,
                    issues: opened_closed(summary.issues_opened, summary.issues_closed),
                    pull_requests: opened_closed(
                        summary.pull_requests_opened,
                        summary.pull_requests_closed,
                    ),
                    comments: comments(&summary),
                    commits: summary.commits,
                    tags: summary.tags,
                }
            })
        })
        .collect()
}

fn opened_closed(opened: u64, closed: u64) -> String {
    format!("+{opened} -{closed}")
}

const fn comments(summary: &ActivitySummary) -> u64 {
    summary.issue_comments + summary.pull_request_comments
}
