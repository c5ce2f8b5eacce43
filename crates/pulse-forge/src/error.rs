//! Forge client error types.

use thiserror::Error;

/// Errors that can occur when talking to the forge or storing credentials.
#[derive(Debug, Error)]
pub enum ForgeError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Forge API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the forge.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The forge refused the request because the rate limit is exhausted.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// Failed to interpret a forge response.
    #[error("parse error: {0}")]
    Parse(String),

    /// No token was found in config, keyring, environment or file.
    #[error("not authenticated: run `pulse auth login --token <TOKEN>`")]
    NotAuthenticated,

    /// Reading or writing stored credentials failed.
    #[error("credential store error: {0}")]
    Credentials(String),

    #[error(transparent)]
    Core(#[from] pulse_core::CoreError),
}
