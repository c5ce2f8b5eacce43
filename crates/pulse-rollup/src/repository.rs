//! Repository level of the rollup tree.
//!
//! A repository owns its activity list and two summaries: one over all
//! activities and one over activities matching the current age filter. Both
//! are absent until activities have been queried. The matched summary is
//! maintained incrementally when the age filter changes.

use chrono::{DateTime, Utc};
use pulse_core::{Activity, ActivitySummary, Filter, RepositoryInfo};

use crate::activity_list::ActivityList;

#[derive(Debug, Clone)]
pub struct RepositoryNode {
    pub info: RepositoryInfo,
    activities: ActivityList,
    activities_queried: bool,
    load_failed: bool,
    activity_summary: Option<ActivitySummary>,
    matched_activity_summary: Option<ActivitySummary>,
    matches_filter: bool,
}

impl RepositoryNode {
    #[must_use]
    pub fn new(info: RepositoryInfo, filter: &Filter) -> Self {
        let mut node = Self {
            info,
            activities: ActivityList::new(),
            activities_queried: false,
            load_failed: false,
            activity_summary: None,
            matched_activity_summary: None,
            matches_filter: true,
        };
        node.update_filter_match(filter);
        node
    }

    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.info.full_name
    }

    #[must_use]
    pub const fn activities(&self) -> &ActivityList {
        &self.activities
    }

    #[must_use]
    pub const fn activities_queried(&self) -> bool {
        self.activities_queried
    }

    /// Whether the most recent activity query failed.
    #[must_use]
    pub const fn load_failed(&self) -> bool {
        self.load_failed
    }

    #[must_use]
    pub const fn activity_summary(&self) -> Option<&ActivitySummary> {
        self.activity_summary.as_ref()
    }

    #[must_use]
    pub const fn matched_activity_summary(&self) -> Option<&ActivitySummary> {
        self.matched_activity_summary.as_ref()
    }

    #[must_use]
    pub const fn matches_filter(&self) -> bool {
        self.matches_filter
    }

    /// Re-evaluate the star filter. Returns whether the flag changed.
    pub fn update_filter_match(&mut self, filter: &Filter) -> bool {
        let matches = filter.match_repo(&self.info);
        let changed = matches != self.matches_filter;
        self.matches_filter = matches;
        changed
    }

    /// Store freshly queried activities and recompute both summaries.
    ///
    /// An empty list is a successful query with no activity and yields zero
    /// summaries rather than absent ones.
    pub fn set_activities(&mut self, activities: Vec<Activity>, filter: &Filter, now: DateTime<Utc>) {
        self.activities.set(activities, filter, now);
        self.activities_queried = true;
        self.load_failed = false;
        self.activity_collection_changed();
        tracing::debug!(
            repo = %self.info.full_name,
            count = self.activities.len(),
            "activities updated"
        );
    }

    /// Recompute both summaries from scratch.
    pub fn activity_collection_changed(&mut self) {
        self.activity_summary = Some(self.activities.summary());
        self.update_matched_activity_summary();
    }

    pub fn update_matched_activity_summary(&mut self) {
        self.matched_activity_summary = Some(self.activities.matched_summary());
    }

    /// Re-evaluate the age filter for every activity and adjust the matched
    /// summary by the activities whose flag flipped. Returns whether the
    /// matched summary changed.
    pub fn apply_age_filter(&mut self, filter: &Filter, now: DateTime<Utc>) -> bool {
        let Some(matched) = self.matched_activity_summary.as_mut() else {
            return false;
        };
        let changed = self.activities.reevaluate(filter, now, |activity, matches| {
            if matches {
                matched.add_activity(activity);
            } else {
                matched.remove_activity(activity);
            }
        });
        changed > 0
    }

    /// Flag a failed activity query. Activities and summaries from an
    /// earlier successful query are kept.
    pub fn mark_load_failed(&mut self) {
        self.load_failed = true;
    }

    /// Forget queried activities; the repository goes back to "not queried".
    pub fn reset_activities(&mut self) {
        self.activities.clear();
        self.activities_queried = false;
        self.load_failed = false;
        self.activity_summary = None;
        self.matched_activity_summary = None;
    }

    /// Take attributes from a fresh provider record, keeping activities and
    /// summaries. Returns whether the star status changed.
    pub fn merge_info(&mut self, info: RepositoryInfo, filter: &Filter) -> bool {
        let starred_changed = self.info.is_starred != info.is_starred;
        self.info = info;
        self.update_filter_match(filter);
        starred_changed
    }

    /// Set the star status from the owning group. Returns whether the filter
    /// match changed.
    pub fn set_starred(&mut self, is_starred: bool, filter: &Filter) -> bool {
        self.info.is_starred = is_starred;
        self.update_filter_match(filter)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone};
    use pretty_assertions::assert_eq;
    use pulse_core::ActivityKind;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 2, 10, 9, 0, 0).unwrap()
    }

    fn info(is_starred: bool) -> RepositoryInfo {
        RepositoryInfo {
            id: 7,
            name: "widget".into(),
            full_name: "acme/widget".into(),
            repo_url: "https://github.com/acme/widget".into(),
            is_starred,
        }
    }

    fn activity(days_ago: i64, kind: ActivityKind) -> Activity {
        Activity::new(now() - TimeDelta::days(days_ago), kind, "t", "u")
    }

    #[test]
    fn summaries_are_absent_until_queried() {
        let repo = RepositoryNode::new(info(false), &Filter::default());
        assert!(!repo.activities_queried());
        assert!(repo.activity_summary().is_none());
        assert!(repo.matched_activity_summary().is_none());
    }

    #[test]
    fn empty_query_yields_zero_summaries() {
        let mut repo = RepositoryNode::new(info(false), &Filter::default());
        repo.set_activities(Vec::new(), &Filter::default(), now());
        assert!(repo.activities_queried());
        assert_eq!(repo.activity_summary(), Some(&ActivitySummary::new()));
        assert_eq!(repo.matched_activity_summary(), Some(&ActivitySummary::new()));
    }

    #[test]
    fn matched_summary_excludes_old_activities() {
        let filter = Filter::default().with_age_days(10);
        let mut repo = RepositoryNode::new(info(false), &filter);
        repo.set_activities(
            vec![
                activity(1, ActivityKind::Commit),
                activity(3, ActivityKind::IssueOpened),
                activity(30, ActivityKind::Commit),
            ],
            &filter,
            now(),
        );
        let all = repo.activity_summary().copied().unwrap();
        let matched = repo.matched_activity_summary().copied().unwrap();
        assert_eq!(all.commits, 2);
        assert_eq!(matched.commits, 1);
        assert_eq!(matched.issues_opened, 1);
    }

    #[test]
    fn age_change_updates_matched_summary_incrementally() {
        let narrow = Filter::default().with_age_days(10);
        let mut repo = RepositoryNode::new(info(false), &narrow);
        repo.set_activities(
            vec![
                activity(1, ActivityKind::Commit),
                activity(30, ActivityKind::Tag),
                activity(60, ActivityKind::PullRequestClosed),
            ],
            &narrow,
            now(),
        );

        let wide = Filter::default().with_age_days(45);
        assert!(repo.apply_age_filter(&wide, now()));
        assert_eq!(
            repo.matched_activity_summary().copied(),
            Some(repo.activities().matched_summary())
        );
        assert_eq!(repo.matched_activity_summary().unwrap().tags, 1);

        let everything = Filter::new(false, 0);
        assert!(repo.apply_age_filter(&everything, now()));
        assert_eq!(repo.matched_activity_summary(), repo.activity_summary());

        assert!(!repo.apply_age_filter(&everything, now()));
    }

    #[test]
    fn age_change_before_query_is_ignored() {
        let mut repo = RepositoryNode::new(info(false), &Filter::default());
        assert!(!repo.apply_age_filter(&Filter::new(false, 0), now()));
        assert!(repo.matched_activity_summary().is_none());
    }

    #[test]
    fn reset_returns_to_not_queried() {
        let mut repo = RepositoryNode::new(info(false), &Filter::default());
        repo.set_activities(vec![activity(1, ActivityKind::Commit)], &Filter::default(), now());
        repo.reset_activities();
        assert!(!repo.activities_queried());
        assert!(repo.activities().is_empty());
        assert!(repo.matched_activity_summary().is_none());
    }

    #[test]
    fn failed_load_keeps_summaries_until_next_query() {
        let mut repo = RepositoryNode::new(info(false), &Filter::default());
        repo.set_activities(vec![activity(1, ActivityKind::Commit)], &Filter::default(), now());
        repo.mark_load_failed();
        assert!(repo.load_failed());
        assert_eq!(repo.activity_summary().unwrap().commits, 1);

        repo.set_activities(Vec::new(), &Filter::default(), now());
        assert!(!repo.load_failed());

        repo.mark_load_failed();
        repo.reset_activities();
        assert!(!repo.load_failed());
    }

    #[test]
    fn star_filter_tracks_info() {
        let starred_only = Filter::default().with_starred(true);
        let mut repo = RepositoryNode::new(info(false), &starred_only);
        assert!(!repo.matches_filter());
        assert!(repo.set_starred(true, &starred_only));
        assert!(repo.matches_filter());
        assert!(repo.merge_info(info(false), &starred_only));
        assert!(!repo.matches_filter());
    }

    #[test]
    fn merge_keeps_activities() {
        let mut repo = RepositoryNode::new(info(false), &Filter::default());
        repo.set_activities(vec![activity(1, ActivityKind::Commit)], &Filter::default(), now());
        let mut renamed = info(false);
        renamed.repo_url = "https://github.com/acme/widget2".into();
        assert!(!repo.merge_info(renamed, &Filter::default()));
        assert_eq!(repo.activities().len(), 1);
        assert_eq!(repo.activity_summary().unwrap().commits, 1);
    }
}
