//! Serializable view of the dashboard tree, used for rendering.

use pulse_core::{ActivitySummary, Filter};
use serde::Serialize;

use crate::activity_list::ActivityEntry;
use crate::dashboard::Dashboard;
use crate::group::GroupNode;
use crate::repository::RepositoryNode;

#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotOptions {
    /// Include individual activities under each repository.
    pub include_activities: bool,
    /// Leave out groups, repositories and activities hidden by the filter.
    pub only_matching: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub filter: Filter,
    pub matched_activity_summary: ActivitySummary,
    pub groups: Vec<GroupSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupSnapshot {
    pub provider: String,
    pub name: String,
    pub avatar_url: String,
    pub starred_repos: usize,
    pub matches_filter: bool,
    pub repos_queried: bool,
    pub matched_activity_summary: ActivitySummary,
    pub repositories: Vec<RepositorySnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepositorySnapshot {
    pub full_name: String,
    pub repo_url: String,
    pub is_starred: bool,
    pub matches_filter: bool,
    pub activities_queried: bool,
    pub load_failed: bool,
    pub activity_summary: Option<ActivitySummary>,
    pub matched_activity_summary: Option<ActivitySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activities: Option<Vec<ActivityEntry>>,
}

impl DashboardSnapshot {
    #[must_use]
    pub fn capture(dashboard: &Dashboard, options: SnapshotOptions) -> Self {
        let groups = dashboard
            .providers()
            .iter()
            .flat_map(|provider| {
                provider
                    .groups()
                    .iter()
                    .filter(move |group| !options.only_matching || group.matches_filter())
                    .map(move |group| GroupSnapshot::capture(&provider.name, group, options))
            })
            .collect();
        Self {
            filter: *dashboard.filter(),
            matched_activity_summary: *dashboard.summary(),
            groups,
        }
    }
}

impl GroupSnapshot {
    fn capture(provider: &str, group: &GroupNode, options: SnapshotOptions) -> Self {
        Self {
            provider: provider.to_string(),
            name: group.info.name.clone(),
            avatar_url: group.info.avatar_url.clone(),
            starred_repos: group.info.starred_repos.len(),
            matches_filter: group.matches_filter(),
            repos_queried: group.repos_queried(),
            matched_activity_summary: *group.matched_activity_summary(),
            repositories: group
                .repositories()
                .iter()
                .filter(|repo| !options.only_matching || repo.matches_filter())
                .map(|repo| RepositorySnapshot::capture(repo, options))
                .collect(),
        }
    }
}

impl RepositorySnapshot {
    fn capture(repo: &RepositoryNode, options: SnapshotOptions) -> Self {
        let activities = options.include_activities.then(|| {
            repo.activities()
                .iter()
                .filter(|entry| !options.only_matching || entry.matches_filter)
                .cloned()
                .collect()
        });
        Self {
            full_name: repo.info.full_name.clone(),
            repo_url: repo.info.repo_url.clone(),
            is_starred: repo.info.is_starred,
            matches_filter: repo.matches_filter(),
            activities_queried: repo.activities_queried(),
            load_failed: repo.load_failed(),
            activity_summary: repo.activity_summary().copied(),
            matched_activity_summary: repo.matched_activity_summary().copied(),
            activities,
        }
    }
}
