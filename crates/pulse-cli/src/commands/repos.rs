use anyhow::Context;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ReposArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

#[derive(Serialize)]
struct RepoRow {
    full_name: String,
    is_starred: bool,
    matches_filter: bool,
    repo_url: String,
}

pub async fn handle(args: &ReposArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let spinner = Progress::spinner(&format!("querying repositories of {}", args.group));
    let user = ctx.current_user().await?;
    let groups = ctx
        .client
        .query_groups(&user)
        .await
        .context("failed to query groups")?;
    let group = groups
        .iter()
        .find(|g| g.name.eq_ignore_ascii_case(&args.group))
        .with_context(|| format!("unknown group '{}'", args.group))?;
    let repos = ctx
        .client
        .query_group_repos(group, &user.login)
        .await
        .with_context(|| format!("failed to query repositories of '{}'", group.name))?;
    spinner.finish_clear();

    let rows = repos
        .into_iter()
        .map(|repo| RepoRow {
            matches_filter: ctx.filter.match_repo(&repo),
            is_starred: repo.is_starred,
            full_name: repo.full_name,
            repo_url: repo.repo_url,
        })
        .filter(|row| args.all || row.matches_filter)
        .collect::<Vec<_>>();
    output(&rows, flags.format)
}
