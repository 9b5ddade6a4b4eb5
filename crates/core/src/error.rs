//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Deterministic domain failure.
///
/// Everything here is a business-rule outcome - bad input, a broken
/// invariant such as shares that do not reconcile to an expense total, or a
/// state conflict. Nothing is retryable and nothing maps to infrastructure;
/// IO failures belong to whatever embeds the engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input that fails a validation rule (empty name, negative share,
    /// non-member payer).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant did not hold (shares out of step with the total).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier could not be parsed or resolved.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The addressed entity does not exist in the aggregate.
    #[error("not found")]
    NotFound,

    /// The command contradicts current state (creating a group that exists,
    /// closing one that is already closed).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
