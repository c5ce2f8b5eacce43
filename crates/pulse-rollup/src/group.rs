//! Group level of the rollup tree.
//!
//! A group keeps its repositories ordered by lowercase full name. Its matched
//! summary is the sum of the matched summaries of every repository passing
//! the star filter. Adding or removing a single repository adjusts the sum
//! in place; everything else re-sums the whole collection, since several
//! changes in one update would otherwise compound their offsets.

use chrono::{DateTime, Utc};
use pulse_core::{Activity, ActivitySummary, Filter, GroupInfo, RepositoryInfo};

use crate::error::RollupError;
use crate::repository::RepositoryNode;

#[derive(Debug, Clone)]
pub struct GroupNode {
    pub info: GroupInfo,
    repositories: Vec<RepositoryNode>,
    matched_activity_summary: ActivitySummary,
    matches_filter: bool,
    repos_queried: bool,
}

impl GroupNode {
    #[must_use]
    pub fn new(info: GroupInfo, filter: &Filter) -> Self {
        let mut node = Self {
            info,
            repositories: Vec::new(),
            matched_activity_summary: ActivitySummary::new(),
            matches_filter: true,
            repos_queried: false,
        };
        node.update_filter_match(filter);
        node
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.info.name
    }

    #[must_use]
    pub fn repositories(&self) -> &[RepositoryNode] {
        &self.repositories
    }

    #[must_use]
    pub fn repository(&self, full_name: &str) -> Option<&RepositoryNode> {
        self.repositories
            .iter()
            .find(|repo| repo.full_name() == full_name)
    }

    #[must_use]
    pub const fn matched_activity_summary(&self) -> &ActivitySummary {
        &self.matched_activity_summary
    }

    #[must_use]
    pub const fn matches_filter(&self) -> bool {
        self.matches_filter
    }

    #[must_use]
    pub const fn repos_queried(&self) -> bool {
        self.repos_queried
    }

    /// Re-evaluate the group's star filter match and re-sum.
    pub fn update_filter_match(&mut self, filter: &Filter) {
        self.matches_filter = filter.match_group(&self.info);
        self.update_matched_activity_summary(filter);
    }

    /// Apply a star filter change to every repository, then to the group.
    pub fn apply_starred_filter(&mut self, filter: &Filter) {
        for repo in &mut self.repositories {
            repo.update_filter_match(filter);
        }
        self.update_filter_match(filter);
    }

    /// Apply an age filter change to every repository's activities, then re-sum.
    pub fn apply_age_filter(&mut self, filter: &Filter, now: DateTime<Utc>) {
        let mut changed = false;
        for repo in &mut self.repositories {
            changed |= repo.apply_age_filter(filter, now);
        }
        if changed {
            self.update_matched_activity_summary(filter);
        }
    }

    /// Full re-summation over repositories passing the filter.
    pub fn update_matched_activity_summary(&mut self, filter: &Filter) {
        self.matched_activity_summary = self
            .repositories
            .iter()
            .filter(|repo| filter.match_repo(&repo.info))
            .filter_map(RepositoryNode::matched_activity_summary)
            .sum();
    }

    /// Merge a freshly queried repository list by id: existing repositories
    /// keep their activities, new ones are added and missing ones removed.
    pub fn set_repositories(&mut self, repos: Vec<RepositoryInfo>, filter: &Filter) {
        let incoming: Vec<u64> = repos.iter().map(|repo| repo.id).collect();
        let removed: Vec<String> = self
            .repositories
            .iter()
            .filter(|repo| !incoming.contains(&repo.info.id))
            .map(|repo| repo.full_name().to_string())
            .collect();
        for full_name in removed {
            let result = self.remove_repository(&full_name, filter);
            debug_assert!(result.is_ok(), "{full_name} was listed from this group");
        }

        for info in repos {
            match self.repositories.iter().position(|repo| repo.info.id == info.id) {
                Some(index) => {
                    let repo = &mut self.repositories[index];
                    let renamed = repo.info.full_name != info.full_name;
                    repo.merge_info(info, filter);
                    if renamed {
                        self.sort_repositories();
                    }
                }
                None => {
                    let full_name = info.full_name.clone();
                    if let Err(error) = self.add_repository(info, filter) {
                        tracing::warn!(%error, repo = %full_name, "skipping repository");
                    }
                }
            }
        }

        self.repos_queried = true;
        self.update_matched_activity_summary(filter);
        tracing::debug!(
            group = %self.info.name,
            count = self.repositories.len(),
            "repositories updated"
        );
    }

    /// Insert a repository in order and add its matched summary when it
    /// passes the filter.
    ///
    /// # Errors
    ///
    /// Returns [`RollupError::DuplicateRepository`] if a repository with the
    /// same id or full name is already present.
    pub fn add_repository(&mut self, info: RepositoryInfo, filter: &Filter) -> Result<(), RollupError> {
        if self
            .repositories
            .iter()
            .any(|repo| repo.info.id == info.id || repo.info.full_name == info.full_name)
        {
            return Err(RollupError::DuplicateRepository(info.full_name));
        }
        let node = RepositoryNode::new(info, filter);
        if filter.match_repo(&node.info) {
            self.matched_activity_summary
                .add_summary(node.matched_activity_summary());
        }
        let key = node.info.sort_key();
        let index = self
            .repositories
            .partition_point(|repo| repo.info.sort_key() <= key);
        self.repositories.insert(index, node);
        Ok(())
    }

    /// Remove a repository and subtract its matched summary when it passed
    /// the filter.
    ///
    /// # Errors
    ///
    /// Returns [`RollupError::UnknownRepository`] if no repository has this full name.
    pub fn remove_repository(
        &mut self,
        full_name: &str,
        filter: &Filter,
    ) -> Result<RepositoryNode, RollupError> {
        let index = self.index_of(full_name)?;
        let node = self.repositories.remove(index);
        if filter.match_repo(&node.info) {
            self.matched_activity_summary
                .remove_summary(node.matched_activity_summary());
        }
        Ok(node)
    }

    /// Recompute each repository's star status from `starred_repos`, then re-sum.
    pub fn update_starred_repos(&mut self, filter: &Filter) {
        for repo in &mut self.repositories {
            let is_starred = self.info.is_repo_starred(&repo.info.name);
            repo.set_starred(is_starred, filter);
        }
        self.update_matched_activity_summary(filter);
    }

    /// Take attributes from a fresh provider record, keeping repositories.
    pub fn merge_info(&mut self, info: GroupInfo, filter: &Filter) {
        let starred_changed = self.info.starred_repos != info.starred_repos;
        self.info = info;
        if starred_changed {
            self.update_filter_match(filter);
            self.update_starred_repos(filter);
        }
    }

    /// Store queried activities on one repository, then re-sum.
    ///
    /// # Errors
    ///
    /// Returns [`RollupError::UnknownRepository`] if no repository has this full name.
    pub fn set_activities(
        &mut self,
        full_name: &str,
        activities: Vec<Activity>,
        filter: &Filter,
        now: DateTime<Utc>,
    ) -> Result<(), RollupError> {
        let index = self.index_of(full_name)?;
        self.repositories[index].set_activities(activities, filter, now);
        self.update_matched_activity_summary(filter);
        Ok(())
    }

    /// Flag a failed activity query on one repository. Sums are unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`RollupError::UnknownRepository`] if no repository has this full name.
    pub fn activities_not_loaded(&mut self, full_name: &str) -> Result<(), RollupError> {
        let index = self.index_of(full_name)?;
        self.repositories[index].mark_load_failed();
        Ok(())
    }

    /// Forget one repository's activities, then re-sum.
    ///
    /// # Errors
    ///
    /// Returns [`RollupError::UnknownRepository`] if no repository has this full name.
    pub fn reset_activities(&mut self, full_name: &str, filter: &Filter) -> Result<(), RollupError> {
        let index = self.index_of(full_name)?;
        self.repositories[index].reset_activities();
        self.update_matched_activity_summary(filter);
        Ok(())
    }

    /// Check the stored sums against a fresh computation, bottom-up.
    ///
    /// # Errors
    ///
    /// Returns [`RollupError::Inconsistent`] for the first mismatch found.
    pub fn verify(&self, filter: &Filter) -> Result<(), RollupError> {
        for repo in &self.repositories {
            if let Some(stored) = repo.matched_activity_summary() {
                let expected = repo.activities().matched_summary();
                if *stored != expected {
                    return Err(RollupError::Inconsistent {
                        level: "repository",
                        name: repo.full_name().to_string(),
                        expected: Box::new(expected),
                        actual: Box::new(*stored),
                    });
                }
            }
        }
        let expected: ActivitySummary = self
            .repositories
            .iter()
            .filter(|repo| filter.match_repo(&repo.info))
            .filter_map(RepositoryNode::matched_activity_summary)
            .sum();
        if expected != self.matched_activity_summary {
            return Err(RollupError::Inconsistent {
                level: "group",
                name: self.info.name.clone(),
                expected: Box::new(expected),
                actual: Box::new(self.matched_activity_summary),
            });
        }
        Ok(())
    }

    fn index_of(&self, full_name: &str) -> Result<usize, RollupError> {
        self.repositories
            .iter()
            .position(|repo| repo.full_name() == full_name)
            .ok_or_else(|| RollupError::UnknownRepository(full_name.to_string()))
    }

    fn sort_repositories(&mut self) {
        self.repositories.sort_by_cached_key(|repo| repo.info.sort_key());
    }
}
