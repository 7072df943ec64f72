//! Domain error model.

use thiserror::Error;

/// Result type used across the change-feed layers.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Only genuine integration defects end up here. Expected conditions (an
/// unmanaged entity, an active lock, an unresolved connector) are modelled as
/// outcomes, never as errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A managed entity reached a lifecycle hook without an identifier.
    #[error("{kind} entity is invalid, no identifier is assigned")]
    MissingIdentifier { kind: &'static str },

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn missing_identifier(kind: &'static str) -> Self {
        Self::MissingIdentifier { kind }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
