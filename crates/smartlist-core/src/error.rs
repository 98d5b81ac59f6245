//! Core error types.

use thiserror::Error;

/// Error while resolving a field reference against the catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ResolveError {
    /// Error kind for programmatic handling.
    pub kind: ResolveErrorKind,
    /// The error message.
    pub message: String,
}

/// Kinds of resolution errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveErrorKind {
    /// Unknown entity type.
    UnknownEntity,
    /// Unknown relation on entity.
    UnknownRelation,
    /// Unknown column on entity.
    UnknownColumn,
}

impl ResolveError {
    /// Create a new resolve error.
    pub fn new(message: impl Into<String>, kind: ResolveErrorKind) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Create an unknown entity error.
    pub fn unknown_entity(entity: &str) -> Self {
        Self::new(
            format!("unknown entity '{}'", entity),
            ResolveErrorKind::UnknownEntity,
        )
    }

    /// Create an unknown relation error.
    pub fn unknown_relation(entity: &str, relation: &str) -> Self {
        Self::new(
            format!("unknown relation '{}' on entity '{}'", relation, entity),
            ResolveErrorKind::UnknownRelation,
        )
    }

    /// Create an unknown column error.
    pub fn unknown_column(entity: &str, column: &str) -> Self {
        Self::new(
            format!("unknown column '{}' on entity '{}'", column, entity),
            ResolveErrorKind::UnknownColumn,
        )
    }
}
