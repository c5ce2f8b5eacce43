//! Rollup error types.

use pulse_core::ActivitySummary;
use thiserror::Error;

/// Errors raised while updating or checking the dashboard tree.
#[derive(Debug, Error)]
pub enum RollupError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error("provider already registered: {0}")]
    DuplicateProvider(String),

    #[error("unknown group '{group}' in provider '{provider}'")]
    UnknownGroup { provider: String, group: String },

    #[error("unknown repository: {0}")]
    UnknownRepository(String),

    #[error("repository already present: {0}")]
    DuplicateRepository(String),

    /// A stored matched summary disagrees with the sum of its children.
    #[error("inconsistent {level} summary for '{name}': stored {actual:?}, expected {expected:?}")]
    Inconsistent {
        level: &'static str,
        name: String,
        expected: Box<ActivitySummary>,
        actual: Box<ActivitySummary>,
    },
}
