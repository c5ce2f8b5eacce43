//! Top level of the rollup tree.
//!
//! The dashboard owns the filter and one group collection per provider. Every
//! mutation goes through it so that the change can be pushed down to the
//! affected nodes and the sums rolled back up:
//!
//! ```text
//! activity ──▶ repository ──▶ group ──▶ dashboard
//!   (age)        (starred)     (Σ matching repos)   (Σ groups)
//! ```

use chrono::{DateTime, Utc};
use pulse_core::{Activity, ActivitySummary, Filter, GroupInfo, RepositoryInfo};

use crate::error::RollupError;
use crate::group::GroupNode;
use crate::snapshot::{DashboardSnapshot, SnapshotOptions};

/// Groups contributed by one forge account.
#[derive(Debug, Clone)]
pub struct ProviderGroups {
    pub name: String,
    groups: Vec<GroupNode>,
}

impl ProviderGroups {
    #[must_use]
    pub fn groups(&self) -> &[GroupNode] {
        &self.groups
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    filter: Filter,
    providers: Vec<ProviderGroups>,
    matched_activity_summary: ActivitySummary,
}

impl Dashboard {
    #[must_use]
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            providers: Vec::new(),
            matched_activity_summary: ActivitySummary::new(),
        }
    }

    #[must_use]
    pub const fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Global matched summary across all providers.
    #[must_use]
    pub const fn summary(&self) -> &ActivitySummary {
        &self.matched_activity_summary
    }

    #[must_use]
    pub fn providers(&self) -> &[ProviderGroups] {
        &self.providers
    }

    /// Register a provider's (initially empty) group collection.
    ///
    /// # Errors
    ///
    /// Returns [`RollupError::DuplicateProvider`] if the name is taken.
    pub fn add_provider(&mut self, name: &str) -> Result<(), RollupError> {
        if self.providers.iter().any(|p| p.name == name) {
            return Err(RollupError::DuplicateProvider(name.to_string()));
        }
        tracing::debug!(provider = name, "provider added");
        self.providers.push(ProviderGroups {
            name: name.to_string(),
            groups: Vec::new(),
        });
        Ok(())
    }

    #[must_use]
    pub fn group(&self, provider: &str, group: &str) -> Option<&GroupNode> {
        self.providers
            .iter()
            .find(|p| p.name == provider)?
            .groups
            .iter()
            .find(|g| g.name() == group)
    }

    /// Merge a freshly queried group list by id; existing groups keep their
    /// repositories.
    ///
    /// # Errors
    ///
    /// Returns [`RollupError::UnknownProvider`] if the provider is not registered.
    pub fn set_groups(&mut self, provider: &str, groups: Vec<GroupInfo>) -> Result<(), RollupError> {
        let filter = self.filter;
        let collection = self.provider_mut(provider)?;
        collection
            .groups
            .retain(|existing| groups.iter().any(|g| g.id == existing.info.id));

        for info in groups {
            match collection.groups.iter_mut().find(|g| g.info.id == info.id) {
                Some(existing) => existing.merge_info(info, &filter),
                None => collection.groups.push(GroupNode::new(info, &filter)),
            }
        }
        collection.groups.sort_by_cached_key(|g| g.info.sort_key());
        tracing::debug!(provider, count = collection.groups.len(), "groups updated");
        self.update_summary();
        Ok(())
    }

    /// Drop a single group.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider or group is unknown.
    pub fn remove_group(&mut self, provider: &str, group: &str) -> Result<GroupNode, RollupError> {
        let collection = self.provider_mut(provider)?;
        let index = collection
            .groups
            .iter()
            .position(|g| g.name() == group)
            .ok_or_else(|| RollupError::UnknownGroup {
                provider: provider.to_string(),
                group: group.to_string(),
            })?;
        let removed = collection.groups.remove(index);
        self.update_summary();
        Ok(removed)
    }

    /// Drop every group of a provider (logout).
    ///
    /// # Errors
    ///
    /// Returns [`RollupError::UnknownProvider`] if the provider is not registered.
    pub fn reset_groups(&mut self, provider: &str) -> Result<(), RollupError> {
        self.provider_mut(provider)?.groups.clear();
        self.update_summary();
        Ok(())
    }

    /// Merge a freshly queried repository list into a group.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider or group is unknown.
    pub fn set_repositories(
        &mut self,
        provider: &str,
        group: &str,
        repos: Vec<RepositoryInfo>,
    ) -> Result<(), RollupError> {
        let filter = self.filter;
        self.group_mut(provider, group)?
            .set_repositories(repos, &filter);
        self.update_summary();
        Ok(())
    }

    /// Remove one repository from a group.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider, group or repository is unknown.
    pub fn remove_repository(
        &mut self,
        provider: &str,
        group: &str,
        full_name: &str,
    ) -> Result<(), RollupError> {
        let filter = self.filter;
        self.group_mut(provider, group)?
            .remove_repository(full_name, &filter)?;
        self.update_summary();
        Ok(())
    }

    /// Store successfully queried activities for a repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider or repository is unknown.
    pub fn set_activities(
        &mut self,
        provider: &str,
        full_name: &str,
        activities: Vec<Activity>,
        now: DateTime<Utc>,
    ) -> Result<(), RollupError> {
        let filter = self.filter;
        self.group_of_repo_mut(provider, full_name)?
            .set_activities(full_name, activities, &filter, now)?;
        self.update_summary();
        Ok(())
    }

    /// Record a failed activity query. The repository is flagged as not
    /// loaded but keeps its activities and summaries; nothing is rolled up.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider or repository is unknown.
    pub fn activities_not_loaded(
        &mut self,
        provider: &str,
        full_name: &str,
    ) -> Result<(), RollupError> {
        tracing::warn!(provider, repo = full_name, "activities not loaded");
        self.group_of_repo_mut(provider, full_name)?
            .activities_not_loaded(full_name)
    }

    /// Forget a repository's activities.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider or repository is unknown.
    pub fn reset_activities(&mut self, provider: &str, full_name: &str) -> Result<(), RollupError> {
        let filter = self.filter;
        self.group_of_repo_mut(provider, full_name)?
            .reset_activities(full_name, &filter)?;
        self.update_summary();
        Ok(())
    }

    /// Replace the filter and push the change through the tree.
    ///
    /// A star change re-matches groups and repositories; an age change
    /// re-evaluates activities. Returns whether anything changed.
    pub fn set_filter(&mut self, filter: Filter, now: DateTime<Utc>) -> bool {
        let change = self.filter.diff(&filter);
        if change.is_empty() {
            return false;
        }
        self.filter = filter;
        for group in self.providers.iter_mut().flat_map(|p| p.groups.iter_mut()) {
            if change.age {
                group.apply_age_filter(&filter, now);
            }
            if change.starred {
                group.apply_starred_filter(&filter);
            }
        }
        tracing::debug!(
            starred = filter.starred,
            age_days = filter.age_days(),
            "filter changed"
        );
        self.update_summary();
        true
    }

    /// Re-sum the global summary from every group.
    pub fn update_summary(&mut self) {
        self.matched_activity_summary = self
            .providers
            .iter()
            .flat_map(|p| p.groups.iter())
            .map(GroupNode::matched_activity_summary)
            .sum();
    }

    /// Check every stored sum against a fresh computation.
    ///
    /// # Errors
    ///
    /// Returns [`RollupError::Inconsistent`] for the first mismatch found.
    pub fn verify(&self) -> Result<(), RollupError> {
        for group in self.providers.iter().flat_map(|p| p.groups.iter()) {
            group.verify(&self.filter)?;
        }
        let expected: ActivitySummary = self
            .providers
            .iter()
            .flat_map(|p| p.groups.iter())
            .map(GroupNode::matched_activity_summary)
            .sum();
        if expected != self.matched_activity_summary {
            return Err(RollupError::Inconsistent {
                level: "dashboard",
                name: String::from("global"),
                expected: Box::new(expected),
                actual: Box::new(self.matched_activity_summary),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn snapshot(&self, options: SnapshotOptions) -> DashboardSnapshot {
        DashboardSnapshot::capture(self, options)
    }

    fn provider_mut(&mut self, provider: &str) -> Result<&mut ProviderGroups, RollupError> {
        self.providers
            .iter_mut()
            .find(|p| p.name == provider)
            .ok_or_else(|| RollupError::UnknownProvider(provider.to_string()))
    }

    fn group_mut(&mut self, provider: &str, group: &str) -> Result<&mut GroupNode, RollupError> {
        self.provider_mut(provider)?
            .groups
            .iter_mut()
            .find(|g| g.name() == group)
            .ok_or_else(|| RollupError::UnknownGroup {
                provider: provider.to_string(),
                group: group.to_string(),
            })
    }

    fn group_of_repo_mut(
        &mut self,
        provider: &str,
        full_name: &str,
    ) -> Result<&mut GroupNode, RollupError> {
        self.provider_mut(provider)?
            .groups
            .iter_mut()
            .find(|g| g.repository(full_name).is_some())
            .ok_or_else(|| RollupError::UnknownRepository(full_name.to_string()))
    }
}
