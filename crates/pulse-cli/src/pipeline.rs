//! Populates a [`Dashboard`] from the forge.
//!
//! Groups are queried first, then the repositories of every selected group,
//! then the activities of every repository. Repository and activity queries
//! run concurrently (bounded by `forge.concurrency`), and each result is
//! applied to the dashboard as it completes.
//!
//! A filter override is applied after loading through
//! [`Dashboard::set_filter`]. The queries use a filter covering both the
//! stored and the override filter, so the result matches a load made with the
//! override from the start.

use anyhow::Context;
use futures::stream::{self, StreamExt};
use pulse_core::{Filter, GroupInfo};
use pulse_rollup::Dashboard;

use crate::context::AppContext;
use crate::progress::Progress;

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    /// Group logins to keep; empty keeps all. Matched case-insensitively.
    pub groups: Vec<String>,
    /// Also query groups and repositories hidden by the starred filter.
    pub include_hidden: bool,
    /// Filter to show instead of the stored one.
    pub filter: Option<Filter>,
}

pub struct LoadReport {
    pub dashboard: Dashboard,
    pub repositories: usize,
    pub repositories_loaded: usize,
    /// Repositories (or `group/*` for whole groups) whose query failed.
    pub not_loaded: Vec<String>,
}

pub async fn load_dashboard(ctx: &AppContext, options: &LoadOptions) -> anyhow::Result<LoadReport> {
    let provider = ctx.provider().to_string();
    let concurrency = ctx.config.forge.concurrency.max(1);
    let target = options.filter.unwrap_or(ctx.filter);
    let scope = ctx.filter.covering(&target);
    let mut dashboard = Dashboard::new(ctx.filter);
    dashboard.add_provider(&provider)?;
    let mut not_loaded = Vec::new();

    let spinner = Progress::spinner("querying groups");
    let user = ctx.current_user().await?;
    let groups = ctx
        .client
        .query_groups(&user)
        .await
        .context("failed to query groups")?;
    let groups = select_groups(groups, &options.groups)?;
    dashboard.set_groups(&provider, groups.clone())?;
    spinner.finish_clear();

    let targets: Vec<&GroupInfo> = groups
        .iter()
        .filter(|group| options.include_hidden || scope.match_group(group))
        .collect();
    let login = user.login.as_str();
    let bar = Progress::bar(targets.len() as u64, "querying repositories");
    let mut repo_results = stream::iter(targets.into_iter().map(|group| async move {
        let result = ctx.client.query_group_repos(group, login).await;
        (group.name.clone(), result)
    }))
    .buffer_unordered(concurrency);
    while let Some((group, result)) = repo_results.next().await {
        bar.inc(1);
        match result {
            Ok(repos) => dashboard.set_repositories(&provider, &group, repos)?,
            Err(error) => {
                tracing::warn!(group, %error, "repositories not loaded");
                not_loaded.push(format!("{group}/*"));
            }
        }
    }
    bar.finish_clear();

    let repos: Vec<String> = dashboard
        .providers()
        .iter()
        .flat_map(|p| p.groups())
        .flat_map(|g| g.repositories())
        .filter(|repo| options.include_hidden || scope.match_repo(&repo.info))
        .map(|repo| repo.full_name().to_string())
        .collect();
    let repositories = repos.len();
    let since = scope.since(ctx.now);
    tracing::debug!(repositories, ?since, "querying activities");

    let bar = Progress::bar(repositories as u64, "querying activities");
    let mut activity_results = stream::iter(repos.into_iter().map(|full_name| async move {
        let activities = ctx.client.query_activities(&full_name, since).await;
        (full_name, activities)
    }))
    .buffer_unordered(concurrency);
    let mut repositories_loaded = 0;
    while let Some((full_name, activities)) = activity_results.next().await {
        bar.inc(1);
        bar.set_message(&full_name);
        match activities {
            Some(activities) => {
                dashboard.set_activities(&provider, &full_name, activities, ctx.now)?;
                repositories_loaded += 1;
            }
            None => {
                dashboard.activities_not_loaded(&provider, &full_name)?;
                not_loaded.push(full_name);
            }
        }
    }
    if not_loaded.is_empty() {
        bar.finish_clear();
    } else {
        bar.finish_err(&format!("{} not loaded", not_loaded.len()));
    }

    if dashboard.set_filter(target, ctx.now) {
        tracing::debug!(
            starred = target.starred,
            age_days = target.age_days(),
            "filter override applied"
        );
    }
    dashboard
        .verify()
        .context("dashboard summaries are inconsistent")?;
    not_loaded.sort();

    Ok(LoadReport {
        dashboard,
        repositories,
        repositories_loaded,
        not_loaded,
    })
}

/// Keep only the requested groups, failing on names the forge did not return.
fn select_groups(groups: Vec<GroupInfo>, wanted: &[String]) -> anyhow::Result<Vec<GroupInfo>> {
    if wanted.is_empty() {
        return Ok(groups);
    }
    if let Some(missing) = wanted
        .iter()
        .find(|name| !groups.iter().any(|g| g.name.eq_ignore_ascii_case(name)))
    {
        anyhow::bail!("unknown group '{missing}'");
    }
    Ok(groups
        .into_iter()
        .filter(|g| wanted.iter().any(|name| g.name.eq_ignore_ascii_case(name)))
        .collect())
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use mockito::{Matcher, ServerGuard};
    use pretty_assertions::assert_eq;
    use pulse_config::PulseConfig;
    use pulse_forge::ForgeClient;

    use super::*;

    const DAY_MS: u64 = pulse_core::filter::DAY_MS;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 6, 10, 12, 0, 0).unwrap()
    }

    fn context(server: &ServerGuard, filter: Filter) -> AppContext {
        let mut config = PulseConfig::default();
        config.forge.api_url = server.url();
        let client = ForgeClient::new(&config.forge, "ghp_test").unwrap();
        AppContext {
            config,
            client,
            filter,
            now: now(),
        }
    }

    fn mock(server: &mut ServerGuard, path: &str, query: Matcher, body: &str) {
        server
            .mock("GET", path)
            .match_query(query)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create();
    }

    /// One user repository whose commits endpoint honours `since`: the
    /// 30-day window sees two commits, the 3-day window only the recent one.
    /// With `fail_comments` the first activity step returns 500.
    async fn forge(fail_comments: bool) -> ServerGuard {
        let mut server = mockito::Server::new_async().await;
        mock(&mut server, "/user", Matcher::Any, r#"{"login": "octocat", "id": 20}"#);
        mock(&mut server, "/user/orgs", Matcher::Any, "[]");
        mock(&mut server, "/user/starred", Matcher::Any, "[]");
        mock(
            &mut server,
            "/user/repos",
            Matcher::Any,
            r#"[{"id": 5, "name": "dotfiles", "full_name": "octocat/dotfiles", "html_url": "https://github.com/octocat/dotfiles"}]"#,
        );
        if fail_comments {
            server
                .mock("GET", "/repos/octocat/dotfiles/issues/comments")
                .match_query(Matcher::Any)
                .with_status(500)
                .create();
        } else {
            mock(
                &mut server,
                "/repos/octocat/dotfiles/issues/comments",
                Matcher::Any,
                "[]",
            );
        }
        for endpoint in ["issues", "tags"] {
            mock(
                &mut server,
                &format!("/repos/octocat/dotfiles/{endpoint}"),
                Matcher::Any,
                "[]",
            );
        }
        mock(
            &mut server,
            "/repos/octocat/dotfiles/commits",
            Matcher::UrlEncoded("since".into(), "2015-05-11T00:00:00Z".into()),
            r#"[
                {"sha": "a", "html_url": "u", "commit": {"message": "new", "committer": {"date": "2015-06-09T00:00:00Z"}}},
                {"sha": "b", "html_url": "u", "commit": {"message": "old", "committer": {"date": "2015-05-20T00:00:00Z"}}}
            ]"#,
        );
        mock(
            &mut server,
            "/repos/octocat/dotfiles/commits",
            Matcher::UrlEncoded("since".into(), "2015-06-07T00:00:00Z".into()),
            r#"[{"sha": "a", "html_url": "u", "commit": {"message": "new", "committer": {"date": "2015-06-09T00:00:00Z"}}}]"#,
        );
        server
    }

    #[tokio::test]
    async fn filter_override_matches_fresh_load() {
        let server = forge(false).await;
        let stored = Filter::new(false, 3 * DAY_MS);
        let wide = Filter::new(false, 30 * DAY_MS);

        let narrow_report = load_dashboard(&context(&server, stored), &LoadOptions::default())
            .await
            .unwrap();
        assert_eq!(narrow_report.dashboard.summary().commits, 1);

        let overridden = load_dashboard(
            &context(&server, stored),
            &LoadOptions {
                filter: Some(wide),
                ..LoadOptions::default()
            },
        )
        .await
        .unwrap();
        let fresh = load_dashboard(&context(&server, wide), &LoadOptions::default())
            .await
            .unwrap();

        assert_eq!(overridden.dashboard.filter(), &wide);
        assert_eq!(overridden.dashboard.summary(), fresh.dashboard.summary());
        assert_eq!(fresh.dashboard.summary().commits, 2);
        assert!(overridden.not_loaded.is_empty());
    }

    #[tokio::test]
    async fn narrowing_override_matches_fresh_load() {
        let server = forge(false).await;
        let stored = Filter::new(false, 30 * DAY_MS);
        let narrow = Filter::new(false, 3 * DAY_MS);

        let overridden = load_dashboard(
            &context(&server, stored),
            &LoadOptions {
                filter: Some(narrow),
                ..LoadOptions::default()
            },
        )
        .await
        .unwrap();
        let fresh = load_dashboard(&context(&server, narrow), &LoadOptions::default())
            .await
            .unwrap();

        assert_eq!(overridden.dashboard.summary(), fresh.dashboard.summary());
        assert_eq!(overridden.dashboard.summary().commits, 1);
    }

    #[tokio::test]
    async fn failed_activity_query_is_flagged() {
        let server = forge(true).await;

        let filter = Filter::new(false, 30 * DAY_MS);
        let report = load_dashboard(&context(&server, filter), &LoadOptions::default())
            .await
            .unwrap();
        assert_eq!(report.not_loaded, vec!["octocat/dotfiles".to_string()]);
        let snapshot = report.dashboard.snapshot(pulse_rollup::SnapshotOptions::default());
        let repo = &snapshot.groups[0].repositories[0];
        assert!(repo.load_failed);
        assert!(!repo.activities_queried);
    }

    fn group(id: u64, name: &str) -> GroupInfo {
        GroupInfo {
            id,
            name: name.into(),
            avatar_url: String::new(),
            starred_repos: Vec::new(),
        }
    }

    #[test]
    fn select_groups_keeps_all_without_selection() {
        let groups = vec![group(1, "acme"), group(2, "octocat")];
        assert_eq!(select_groups(groups.clone(), &[]).unwrap(), groups);
    }

    #[test]
    fn select_groups_is_case_insensitive() {
        let groups = vec![group(1, "Acme"), group(2, "octocat")];
        let selected = select_groups(groups, &["acme".to_string()]).unwrap();
        assert_eq!(selected, vec![group(1, "Acme")]);
    }

    #[test]
    fn select_groups_rejects_unknown_names() {
        let groups = vec![group(1, "acme")];
        let err = select_groups(groups, &["nope".to_string()]).unwrap_err();
        assert!(err.to_string().contains("unknown group 'nope'"));
    }
}
