//! Typed domain error enums.
//!
//! Every error is surfaced to the caller as-is. Nothing in this crate
//! retries or recovers silently.

use thiserror::Error;

// ── Parameter errors ──────────────────────────────────────────────────────────

/// Errors raised while constructing or decoding a [`crate::Parameter`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("Invalid parameter: {0}")]
    InvalidArgument(String),
}

// ── Agent pool errors ─────────────────────────────────────────────────────────

/// Errors surfaced by agent pool operations.
///
/// `Transport` carries failures raised by the transport collaborator that do
/// not map onto one of the domain kinds (connection refused, bad gateway, ...).
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{entity} '{key}' not found.")]
    NotFound { entity: &'static str, key: String },

    #[error("Agent pool '{0}' already exists.")]
    Conflict(String),

    #[error("Operation not allowed: {0}")]
    InvalidOperation(String),

    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

impl PoolError {
    /// Shorthand for a missing agent pool.
    pub fn pool_not_found(key: impl ToString) -> Self {
        Self::NotFound {
            entity: "Agent pool",
            key: key.to_string(),
        }
    }

    /// Shorthand for a missing project.
    pub fn project_not_found(key: impl ToString) -> Self {
        Self::NotFound {
            entity: "Project",
            key: key.to_string(),
        }
    }

    /// `true` for `NotFound` regardless of entity.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity_and_key() {
        let err = PoolError::pool_not_found(42);
        assert_eq!(err.to_string(), "Agent pool '42' not found.");
        assert!(err.is_not_found());

        let err = PoolError::project_not_found("Project_1");
        assert_eq!(err.to_string(), "Project 'Project_1' not found.");
    }

    #[test]
    fn transport_error_is_transparent() {
        let err = PoolError::from(anyhow::anyhow!("connection refused"));
        assert_eq!(err.to_string(), "connection refused");
        assert!(!err.is_not_found());
    }
}
