//! Cross-cutting error types for Pulse.
//!
//! Domain-specific errors (`RollupError`, `ForgeError`, `ConfigError`) live in
//! their respective crates and converge into `anyhow` in `pulse-cli`.

use thiserror::Error;

/// Errors that can be raised by any Pulse crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A repository full name did not have the `owner/name` shape.
    #[error("Invalid repository name '{0}': expected 'owner/name'")]
    InvalidRepositoryName(String),

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}
