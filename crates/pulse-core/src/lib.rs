//! # pulse-core
//!
//! Core types shared across all Pulse crates:
//! - [`ActivitySummary`] counters and their arithmetic
//! - [`Activity`] records and the [`ActivityKind`] that decides which counter they feed
//! - Provider records for repositories ([`RepositoryInfo`]) and groups ([`GroupInfo`])
//! - The dashboard [`Filter`] (star status and recency)
//! - Cross-cutting error types

pub mod activity;
pub mod errors;
pub mod filter;
pub mod group;
pub mod repository;
pub mod summary;

pub use activity::{Activity, ActivityKind};
pub use errors::CoreError;
pub use filter::{Filter, FilterChange};
pub use group::GroupInfo;
pub use repository::RepositoryInfo;
pub use summary::ActivitySummary;
