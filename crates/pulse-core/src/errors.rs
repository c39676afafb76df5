//! Cross-cutting error types for Pulse.
//!
//! Domain-specific errors (`ConfigError`, `StoreError`) live in their own
//! crates. The binary converges everything into `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any Pulse crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    /// Shorthand for a missing record.
    #[must_use]
    pub fn record_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "record".to_string(),
            id: id.into(),
        }
    }
}
