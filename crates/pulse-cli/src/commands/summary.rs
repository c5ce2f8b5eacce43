use pulse_core::ActivitySummary;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SummaryArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::pipeline::{LoadOptions, load_dashboard};

#[derive(Serialize)]
struct SummaryResponse {
    starred_only: bool,
    age_days: u64,
    since: Option<String>,
    groups: usize,
    repositories: usize,
    repositories_loaded: usize,
    repositories_not_loaded: usize,
    #[serde(flatten)]
    summary: ActivitySummary,
    total: u64,
}

pub async fn handle(
    args: &SummaryArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let options = LoadOptions {
        filter: Some(args.filter.apply(ctx.filter)),
        ..LoadOptions::default()
    };
    let report = load_dashboard(ctx, &options).await?;
    let dashboard = &report.dashboard;
    let filter = *dashboard.filter();
    let summary = *dashboard.summary();
    let groups = dashboard
        .providers()
        .iter()
        .flat_map(|p| p.groups())
        .filter(|g| g.matches_filter())
        .count();

    output(
        &SummaryResponse {
            starred_only: filter.starred,
            age_days: filter.age_days(),
            since: filter.since(ctx.now).map(|s| s.to_rfc3339()),
            groups,
            repositories: report.repositories,
            repositories_loaded: report.repositories_loaded,
            repositories_not_loaded: report.not_loaded.len(),
            summary,
            total: summary.total(),
        },
        flags.format,
    )
}
