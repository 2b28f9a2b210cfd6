//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures of the rebalancing pipeline
/// (malformed input, empty data). IO and collaborator failures belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input failed validation: missing column, wrong type, non-finite value.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// An evaluation was requested over a snapshot with no rows.
    #[error("snapshot is empty")]
    EmptySnapshot,

    /// A transfer references a (store, product) pair absent from the snapshot.
    ///
    /// Only raised when the caller asked for strict application; the default
    /// policy records the event and keeps going.
    #[error("unmatched transfer: {0}")]
    UnmatchedTransfer(String),

    /// An identifier was invalid (e.g. blank or unparsable).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    pub fn unmatched(msg: impl Into<String>) -> Self {
        Self::UnmatchedTransfer(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn empty_snapshot() -> Self {
        Self::EmptySnapshot
    }

    /// Prefix a malformed-input message with where it happened (e.g. `row 4`).
    pub fn with_context(self, context: impl core::fmt::Display) -> Self {
        match self {
            Self::MalformedInput(msg) => Self::MalformedInput(format!("{context}: {msg}")),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = DomainError::malformed("row 3: column `inventory` is missing");
        assert_eq!(
            err.to_string(),
            "malformed input: row 3: column `inventory` is missing"
        );
        assert_eq!(DomainError::empty_snapshot().to_string(), "snapshot is empty");
    }

    #[test]
    fn context_only_prefixes_malformed_input() {
        let err = DomainError::malformed("inventory must be finite").with_context("row 2");
        assert_eq!(err, DomainError::malformed("row 2: inventory must be finite"));
        assert_eq!(
            DomainError::EmptySnapshot.with_context("row 2"),
            DomainError::EmptySnapshot
        );
    }
}
