//! Activity counters aggregated at every level of the dashboard.
//!
//! A summary is a plain bag of eight counters. Repositories sum their
//! activities, groups sum their repositories and the dashboard sums its
//! groups, so the same arithmetic is used at every level.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::activity::{Activity, ActivityKind};

/// Counters for each kind of tracked activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub issues_opened: u64,
    pub issues_closed: u64,
    pub issue_comments: u64,
    pub pull_requests_opened: u64,
    pub pull_requests_closed: u64,
    pub pull_request_comments: u64,
    pub tags: u64,
    pub commits: u64,
}

impl ActivitySummary {
    /// A summary with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            issues_opened: 0,
            issues_closed: 0,
            issue_comments: 0,
            pull_requests_opened: 0,
            pull_requests_closed: 0,
            pull_request_comments: 0,
            tags: 0,
            commits: 0,
        }
    }

    /// Summary of a single activity.
    #[must_use]
    pub fn of(activity: &Activity) -> Self {
        let mut summary = Self::new();
        summary.add_activity(activity);
        summary
    }

    #[must_use]
    pub const fn has_any_activity(&self) -> bool {
        self.has_issue_activity()
            || self.has_pull_request_activity()
            || self.tags > 0
            || self.commits > 0
    }

    #[must_use]
    pub const fn has_issue_activity(&self) -> bool {
        self.issues_opened > 0 || self.issues_closed > 0 || self.issue_comments > 0
    }

    #[must_use]
    pub const fn has_pull_request_activity(&self) -> bool {
        self.pull_requests_opened > 0
            || self.pull_requests_closed > 0
            || self.pull_request_comments > 0
    }

    /// Sum of all counters.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.issues_opened
            .saturating_add(self.issues_closed)
            .saturating_add(self.issue_comments)
            .saturating_add(self.pull_requests_opened)
            .saturating_add(self.pull_requests_closed)
            .saturating_add(self.pull_request_comments)
            .saturating_add(self.tags)
            .saturating_add(self.commits)
    }

    pub fn add_activity(&mut self, activity: &Activity) {
        if let Some(counter) = self.counter_mut(activity.kind) {
            *counter += 1;
        }
    }

    /// Subtract a previously added activity. Counters saturate at zero.
    pub fn remove_activity(&mut self, activity: &Activity) {
        if let Some(counter) = self.counter_mut(activity.kind) {
            *counter = counter.saturating_sub(1);
        }
    }

    /// Add another summary. An absent summary is a no-op.
    pub fn add_summary(&mut self, summary: Option<&Self>) {
        if let Some(summary) = summary {
            *self += *summary;
        }
    }

    /// Subtract another summary. An absent summary is a no-op.
    pub fn remove_summary(&mut self, summary: Option<&Self>) {
        if let Some(summary) = summary {
            *self -= *summary;
        }
    }

    /// Compare with a possibly absent summary; absent never compares equal.
    #[must_use]
    pub fn is_equal(&self, other: Option<&Self>) -> bool {
        other.is_some_and(|other| self == other)
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn counter_mut(&mut self, kind: ActivityKind) -> Option<&mut u64> {
        match kind {
            ActivityKind::IssueOpened => Some(&mut self.issues_opened),
            ActivityKind::IssueClosed => Some(&mut self.issues_closed),
            ActivityKind::IssueComment => Some(&mut self.issue_comments),
            ActivityKind::PullRequestOpened => Some(&mut self.pull_requests_opened),
            ActivityKind::PullRequestClosed => Some(&mut self.pull_requests_closed),
            ActivityKind::PullRequestComment => Some(&mut self.pull_request_comments),
            ActivityKind::Tag => Some(&mut self.tags),
            ActivityKind::Commit => Some(&mut self.commits),
            ActivityKind::Comment => None,
        }
    }
}

impl AddAssign for ActivitySummary {
    fn add_assign(&mut self, rhs: Self) {
        self.issues_opened += rhs.issues_opened;
        self.issues_closed += rhs.issues_closed;
        self.issue_comments += rhs.issue_comments;
        self.pull_requests_opened += rhs.pull_requests_opened;
        self.pull_requests_closed += rhs.pull_requests_closed;
        self.pull_request_comments += rhs.pull_request_comments;
        self.tags += rhs.tags;
        self.commits += rhs.commits;
    }
}

impl SubAssign for ActivitySummary {
    fn sub_assign(&mut self, rhs: Self) {
        self.issues_opened = self.issues_opened.saturating_sub(rhs.issues_opened);
        self.issues_closed = self.issues_closed.saturating_sub(rhs.issues_closed);
        self.issue_comments = self.issue_comments.saturating_sub(rhs.issue_comments);
        self.pull_requests_opened = self
            .pull_requests_opened
            .saturating_sub(rhs.pull_requests_opened);
        self.pull_requests_closed = self
            .pull_requests_closed
            .saturating_sub(rhs.pull_requests_closed);
        self.pull_request_comments = self
            .pull_request_comments
            .saturating_sub(rhs.pull_request_comments);
        self.tags = self.tags.saturating_sub(rhs.tags);
        self.commits = self.commits.saturating_sub(rhs.commits);
    }
}

impl Add for ActivitySummary {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl Sub for ActivitySummary {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl Sum for ActivitySummary {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::new(), Add::add)
    }
}

impl<'a> Sum<&'a Self> for ActivitySummary {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn activity(kind: ActivityKind) -> Activity {
        Activity::new(
            Utc.with_ymd_and_hms(2015, 3, 1, 12, 0, 0).unwrap(),
            kind,
            "text",
            "https://example.test/a",
        )
    }

    #[test]
    fn new_summary_has_no_activity() {
        let summary = ActivitySummary::new();
        assert!(!summary.has_any_activity());
        assert!(!summary.has_issue_activity());
        assert!(!summary.has_pull_request_activity());
        assert_eq!(summary.total(), 0);
    }

    #[rstest]
    #[case(ActivityKind::IssueOpened, true, false)]
    #[case(ActivityKind::IssueClosed, true, false)]
    #[case(ActivityKind::IssueComment, true, false)]
    #[case(ActivityKind::PullRequestOpened, false, true)]
    #[case(ActivityKind::PullRequestClosed, false, true)]
    #[case(ActivityKind::PullRequestComment, false, true)]
    #[case(ActivityKind::Tag, false, false)]
    #[case(ActivityKind::Commit, false, false)]
    fn single_activity_flags(
        #[case] kind: ActivityKind,
        #[case] issue: bool,
        #[case] pull_request: bool,
    ) {
        let summary = ActivitySummary::of(&activity(kind));
        assert!(summary.has_any_activity());
        assert_eq!(summary.has_issue_activity(), issue);
        assert_eq!(summary.has_pull_request_activity(), pull_request);
        assert_eq!(summary.total(), 1);
    }

    #[test]
    fn plain_comment_counts_nothing() {
        let summary = ActivitySummary::of(&activity(ActivityKind::Comment));
        assert!(!summary.has_any_activity());
    }

    #[test]
    fn add_then_remove_activity_restores_zero() {
        let mut summary = ActivitySummary::new();
        let commit = activity(ActivityKind::Commit);
        summary.add_activity(&commit);
        summary.add_activity(&commit);
        assert_eq!(summary.commits, 2);
        summary.remove_activity(&commit);
        summary.remove_activity(&commit);
        assert_eq!(summary, ActivitySummary::new());
    }

    #[test]
    fn remove_saturates_at_zero() {
        let mut summary = ActivitySummary::new();
        summary.remove_activity(&activity(ActivityKind::Tag));
        assert_eq!(summary.tags, 0);

        let other = ActivitySummary {
            commits: 3,
            ..ActivitySummary::default()
        };
        summary.remove_summary(Some(&other));
        assert_eq!(summary.commits, 0);
    }

    #[test]
    fn total_saturates_instead_of_overflowing() {
        let summary = ActivitySummary {
            commits: u64::MAX,
            tags: 2,
            ..ActivitySummary::default()
        };
        assert_eq!(summary.total(), u64::MAX);
    }

    #[test]
    fn absent_summaries_are_ignored() {
        let mut summary = ActivitySummary {
            tags: 2,
            ..ActivitySummary::default()
        };
        summary.add_summary(None);
        summary.remove_summary(None);
        assert_eq!(summary.tags, 2);
        assert!(!summary.is_equal(None));
        assert!(summary.is_equal(Some(&summary)));
    }

    #[test]
    fn summaries_sum_fieldwise() {
        let a = ActivitySummary {
            issues_opened: 1,
            commits: 4,
            ..ActivitySummary::default()
        };
        let b = ActivitySummary {
            issues_opened: 2,
            pull_request_comments: 5,
            ..ActivitySummary::default()
        };
        let total: ActivitySummary = [a, b].iter().sum();
        assert_eq!(
            total,
            ActivitySummary {
                issues_opened: 3,
                pull_request_comments: 5,
                commits: 4,
                ..ActivitySummary::default()
            }
        );
        assert_eq!(total - b, a);
    }

    #[test]
    fn reset_clears_all_counters() {
        let mut summary = ActivitySummary {
            issues_closed: 7,
            tags: 1,
            ..ActivitySummary::default()
        };
        summary.reset();
        assert_eq!(summary, ActivitySummary::new());
    }
}
