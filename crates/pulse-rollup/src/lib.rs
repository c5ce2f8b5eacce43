//! # pulse-rollup
//!
//! Hierarchical activity summaries for Pulse.
//!
//! The tree mirrors the forge: a [`Dashboard`] holds one group collection per
//! provider, each [`GroupNode`] holds its [`RepositoryNode`]s, and each
//! repository holds an [`ActivityList`]. Summaries are maintained as data
//! arrives and as the [`pulse_core::Filter`] changes, so that at all times:
//!
//! - a repository's matched summary is the sum of its matching activities,
//! - a group's matched summary is the sum of the matched summaries of its
//!   repositories passing the star filter,
//! - the dashboard summary is the sum of all groups' matched summaries.
//!
//! [`Dashboard::verify`] checks all three.

pub mod activity_list;
pub mod dashboard;
pub mod group;
pub mod repository;
pub mod snapshot;

mod error;

pub use activity_list::{ActivityEntry, ActivityList};
pub use dashboard::{Dashboard, ProviderGroups};
pub use error::RollupError;
pub use group::GroupNode;
pub use repository::RepositoryNode;
pub use snapshot::{DashboardSnapshot, SnapshotOptions};
