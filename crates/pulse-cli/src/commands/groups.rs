use anyhow::Context;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

#[derive(Serialize)]
struct GroupRow {
    name: String,
    id: u64,
    starred_repos: usize,
    matches_filter: bool,
    avatar_url: String,
}

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let spinner = Progress::spinner("querying groups");
    let user = ctx.current_user().await?;
    let groups = ctx
        .client
        .query_groups(&user)
        .await
        .context("failed to query groups")?;
    spinner.finish_clear();

    let rows = groups
        .into_iter()
        .map(|group| GroupRow {
            matches_filter: ctx.filter.match_group(&group),
            starred_repos: group.starred_repos.len(),
            name: group.name,
            id: group.id,
            avatar_url: group.avatar_url,
        })
        .collect::<Vec<_>>();
    output(&rows, flags.format)
}
