//! Dashboard filter: star status and recency.
//!
//! The filter decides which groups and repositories are counted (star
//! status) and which activities are counted (age). It is persisted as JSON
//! `{"starred": bool, "age": <milliseconds>}`.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::Activity;
use crate::group::GroupInfo;
use crate::repository::RepositoryInfo;

/// Milliseconds in one day.
pub const DAY_MS: u64 = 24 * 60 * 60 * 1000;

/// Default maximum activity age: one year.
pub const DEFAULT_AGE_MS: u64 = 365 * DAY_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filter {
    /// Only count starred repositories (and groups containing any).
    pub starred: bool,
    /// Maximum activity age in milliseconds; `0` disables the age filter.
    #[serde(rename = "age")]
    pub age_ms: u64,
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            starred: false,
            age_ms: DEFAULT_AGE_MS,
        }
    }
}

/// Which parts of a filter differ between two values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterChange {
    pub starred: bool,
    pub age: bool,
}

impl FilterChange {
    #[must_use]
    pub const fn is_empty(self) -> bool {
        !self.starred && !self.age
    }
}

impl Filter {
    #[must_use]
    pub const fn new(starred: bool, age_ms: u64) -> Self {
        Self { starred, age_ms }
    }

    #[must_use]
    pub const fn with_age_days(self, days: u64) -> Self {
        Self {
            age_ms: days.saturating_mul(DAY_MS),
            ..self
        }
    }

    #[must_use]
    pub const fn with_starred(self, starred: bool) -> Self {
        Self { starred, ..self }
    }

    /// Age in whole days, rounded to the nearest day.
    #[must_use]
    pub const fn age_days(&self) -> u64 {
        self.age_ms.saturating_add(DAY_MS / 2) / DAY_MS
    }

    #[must_use]
    pub const fn diff(&self, other: &Self) -> FilterChange {
        FilterChange {
            starred: self.starred != other.starred,
            age: self.age_ms != other.age_ms,
        }
    }

    /// The narrowest filter that matches everything either `self` or
    /// `other` matches. Querying with it yields enough data to evaluate both.
    #[must_use]
    pub const fn covering(&self, other: &Self) -> Self {
        let age_ms = if self.age_ms == 0 || other.age_ms == 0 {
            0
        } else if self.age_ms > other.age_ms {
            self.age_ms
        } else {
            other.age_ms
        };
        Self {
            starred: self.starred && other.starred,
            age_ms,
        }
    }

    #[must_use]
    pub fn match_group(&self, group: &GroupInfo) -> bool {
        if !self.starred {
            return true;
        }
        !group.starred_repos.is_empty()
    }

    #[must_use]
    pub const fn match_repo(&self, repo: &RepositoryInfo) -> bool {
        if !self.starred {
            return true;
        }
        repo.is_starred
    }

    /// An activity matches unless it is older than `now - age`.
    #[must_use]
    pub fn match_activity(&self, activity: &Activity, now: DateTime<Utc>) -> bool {
        match self.cutoff(now) {
            Some(cutoff) => cutoff <= activity.timestamp,
            None => true,
        }
    }

    /// Oldest timestamp still inside the age window, if the age filter is on.
    #[must_use]
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.age_ms == 0 {
            return None;
        }
        let age = i64::try_from(self.age_ms)
            .ok()
            .and_then(TimeDelta::try_milliseconds)
            .unwrap_or(TimeDelta::MAX);
        now.checked_sub_signed(age)
    }

    /// Start of the UTC day containing the cutoff; used as the `since`
    /// bound when querying a forge.
    #[must_use]
    pub fn since(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.cutoff(now)
            .and_then(|cutoff| cutoff.date_naive().and_hms_opt(0, 0, 0))
            .map(|midnight| midnight.and_utc())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::activity::ActivityKind;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 6, 15, 18, 45, 10).unwrap()
    }

    fn activity_days_ago(days: i64) -> Activity {
        Activity::new(
            now() - TimeDelta::days(days),
            ActivityKind::Commit,
            "Commit: x",
            "u",
        )
    }

    fn repo(is_starred: bool) -> RepositoryInfo {
        RepositoryInfo {
            id: 1,
            name: "r".into(),
            full_name: "g/r".into(),
            repo_url: String::new(),
            is_starred,
        }
    }

    #[test]
    fn defaults_are_one_year_unstarred() {
        let filter = Filter::default();
        assert!(!filter.starred);
        assert_eq!(filter.age_ms, 31_536_000_000);
        assert_eq!(filter.age_days(), 365);
    }

    #[test]
    fn json_uses_age_key_and_fills_missing_fields() {
        let json = serde_json::to_string(&Filter::new(true, DAY_MS)).unwrap();
        assert_eq!(json, r#"{"starred":true,"age":86400000}"#);

        let partial: Filter = serde_json::from_str(r#"{"starred":true}"#).unwrap();
        assert_eq!(partial, Filter::new(true, DEFAULT_AGE_MS));
    }

    #[rstest]
    #[case(false, false, true)]
    #[case(false, true, true)]
    #[case(true, false, false)]
    #[case(true, true, true)]
    fn repo_matching(#[case] starred_filter: bool, #[case] is_starred: bool, #[case] expected: bool) {
        let filter = Filter::default().with_starred(starred_filter);
        assert_eq!(filter.match_repo(&repo(is_starred)), expected);
    }

    #[test]
    fn group_matching_requires_starred_repos_when_filtering() {
        let mut group = GroupInfo {
            id: 1,
            name: "acme".into(),
            avatar_url: String::new(),
            starred_repos: Vec::new(),
        };
        assert!(Filter::default().match_group(&group));
        assert!(!Filter::default().with_starred(true).match_group(&group));
        group.starred_repos.push("widget".into());
        assert!(Filter::default().with_starred(true).match_group(&group));
    }

    #[rstest]
    #[case(0, 9, true)]
    #[case(10, 9, true)]
    #[case(10, 11, false)]
    #[case(365, 364, true)]
    #[case(365, 400, false)]
    fn activity_age_matching(#[case] age_days: u64, #[case] days_ago: i64, #[case] expected: bool) {
        let filter = Filter::default().with_age_days(age_days);
        assert_eq!(filter.match_activity(&activity_days_ago(days_ago), now()), expected);
    }

    #[test]
    fn activity_exactly_at_cutoff_matches() {
        let filter = Filter::default().with_age_days(10);
        assert!(filter.match_activity(&activity_days_ago(10), now()));
    }

    #[test]
    fn since_truncates_to_midnight_utc() {
        let filter = Filter::default().with_age_days(10);
        assert_eq!(
            filter.since(now()),
            Some(Utc.with_ymd_and_hms(2015, 6, 5, 0, 0, 0).unwrap())
        );
        assert_eq!(Filter::new(false, 0).since(now()), None);
    }

    #[test]
    fn huge_age_never_excludes() {
        let filter = Filter::new(false, u64::MAX);
        assert!(filter.match_activity(&activity_days_ago(100_000), now()));
    }

    #[test]
    fn age_days_rounds_to_nearest() {
        assert_eq!(Filter::new(false, DAY_MS + DAY_MS / 2).age_days(), 2);
        assert_eq!(Filter::new(false, DAY_MS + DAY_MS / 2 - 1).age_days(), 1);
    }

    #[rstest]
    #[case(Filter::new(true, DAY_MS), Filter::new(true, 3 * DAY_MS), Filter::new(true, 3 * DAY_MS))]
    #[case(Filter::new(true, DAY_MS), Filter::new(false, DAY_MS), Filter::new(false, DAY_MS))]
    #[case(Filter::new(false, 0), Filter::new(true, DAY_MS), Filter::new(false, 0))]
    fn covering_widens_both_parts(#[case] a: Filter, #[case] b: Filter, #[case] expected: Filter) {
        assert_eq!(a.covering(&b), expected);
        assert_eq!(b.covering(&a), expected);
    }

    #[test]
    fn diff_reports_changed_parts() {
        let a = Filter::default();
        assert!(a.diff(&a).is_empty());
        let b = a.with_starred(true);
        assert_eq!(a.diff(&b), FilterChange { starred: true, age: false });
        let c = a.with_age_days(3);
        assert_eq!(a.diff(&c), FilterChange { starred: false, age: true });
    }
}
