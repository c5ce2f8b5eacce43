//! Newest-first list of a repository's activities with per-entry filter flags.

use chrono::{DateTime, Utc};
use pulse_core::{Activity, ActivitySummary, Filter};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    #[serde(flatten)]
    pub activity: Activity,
    pub matches_filter: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ActivityList {
    entries: Vec<ActivityEntry>,
}

impl ActivityList {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Replace the contents. Activities carry no identity, so nothing from
    /// the previous contents survives.
    ///
    /// Entries are ordered newest first; equal timestamps keep their input order.
    pub fn set(&mut self, mut activities: Vec<Activity>, filter: &Filter, now: DateTime<Utc>) {
        activities.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        self.entries = activities
            .into_iter()
            .map(|activity| ActivityEntry {
                matches_filter: filter.match_activity(&activity, now),
                activity,
            })
            .collect();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Re-evaluate every entry against `filter`, calling `on_change` with
    /// the activity and its new flag for each entry whose flag flipped.
    /// Returns the number of flipped entries.
    pub fn reevaluate(
        &mut self,
        filter: &Filter,
        now: DateTime<Utc>,
        mut on_change: impl FnMut(&Activity, bool),
    ) -> usize {
        let mut changed = 0;
        for entry in &mut self.entries {
            let matches = filter.match_activity(&entry.activity, now);
            if matches != entry.matches_filter {
                entry.matches_filter = matches;
                on_change(&entry.activity, matches);
                changed += 1;
            }
        }
        changed
    }

    #[must_use]
    pub fn summary(&self) -> ActivitySummary {
        let mut summary = ActivitySummary::new();
        for entry in &self.entries {
            summary.add_activity(&entry.activity);
        }
        summary
    }

    #[must_use]
    pub fn matched_summary(&self) -> ActivitySummary {
        let mut summary = ActivitySummary::new();
        for entry in self.entries.iter().filter(|entry| entry.matches_filter) {
            summary.add_activity(&entry.activity);
        }
        summary
    }

    #[must_use]
    pub fn entries(&self) -> &[ActivityEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn matching(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter().filter(|entry| entry.matches_filter)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
