//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::Kind;

/// Domain errors represent merge policy violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Strict mode refused to replace a node with one of another kind.
    #[error("can't merge a {from} into a {into}")]
    KindMismatch { from: Kind, into: Kind },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
