//! Store error types.

use thiserror::Error;

/// Errors from reading or writing records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status and no function error.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Response body.
        message: String,
    },

    /// The backend function itself reported a failure. Displays as the bare
    /// reason so callers can wrap it in their own wording.
    #[error("{0}")]
    Function(String),

    /// Failed to decode a backend response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Backend configuration is missing or invalid.
    #[error(transparent)]
    Config(#[from] pulse_config::ConfigError),

    /// Domain-level failure (e.g., patching an unknown record).
    #[error(transparent)]
    Core(#[from] pulse_core::errors::CoreError),
}
