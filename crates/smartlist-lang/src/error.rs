//! Error types for rule validation and compilation.

use smartlist_core::{ResolveError, ResolveErrorKind};
use thiserror::Error;

/// Position of a rule inside a raw rule tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleLocation {
    /// Index of the group in the tree.
    pub group: usize,
    /// Index of the rule in its group.
    pub rule: usize,
}

/// Error during rule validation or compilation.
#[derive(Debug, Clone, Error, PartialEq)]
pub struct CompileError {
    /// The error message.
    pub message: String,
    /// Error kind for programmatic handling.
    pub kind: CompileErrorKind,
    /// Rule the error was raised for, when known.
    pub location: Option<RuleLocation>,
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.location {
            Some(loc) => write!(
                f,
                "{} (group {}, rule {})",
                self.message, loc.group, loc.rule
            ),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Kinds of compilation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileErrorKind {
    /// Operator name is not in the registry.
    UnknownOperator,
    /// Value count does not match the operator's arity.
    InvalidArity,
    /// Field does not exist on the resolved entity.
    UnknownColumn,
    /// Relation prefix does not name a relation of the base entity.
    UnknownRelation,
    /// Base entity is not in the catalog.
    UnknownEntity,
    /// A value cannot be used with its operator.
    InvalidValue,
    /// The rule payload does not have the rule tree shape.
    InvalidRule,
}

impl CompileError {
    /// Create a new compile error.
    pub fn new(message: impl Into<String>, kind: CompileErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
            location: None,
        }
    }

    /// Attach the rule position, keeping an existing one.
    pub fn at(mut self, group: usize, rule: usize) -> Self {
        self.location.get_or_insert(RuleLocation { group, rule });
        self
    }

    /// Create an unknown operator error.
    pub fn unknown_operator(name: &str) -> Self {
        Self::new(
            format!("unknown operator '{}'", name),
            CompileErrorKind::UnknownOperator,
        )
    }

    /// Create an arity mismatch error.
    pub fn invalid_arity(operator: &str, expected: usize, got: usize) -> Self {
        Self::new(
            format!(
                "operator '{}' takes {} value(s), got {}",
                operator, expected, got
            ),
            CompileErrorKind::InvalidArity,
        )
    }

    /// Create an invalid value error.
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::new(message, CompileErrorKind::InvalidValue)
    }

    /// Create an invalid rule payload error.
    pub fn invalid_rule(message: impl Into<String>) -> Self {
        Self::new(message, CompileErrorKind::InvalidRule)
    }
}

impl From<ResolveError> for CompileError {
    fn from(err: ResolveError) -> Self {
        let kind = match err.kind {
            ResolveErrorKind::UnknownEntity => CompileErrorKind::UnknownEntity,
            ResolveErrorKind::UnknownRelation => CompileErrorKind::UnknownRelation,
            ResolveErrorKind::UnknownColumn => CompileErrorKind::UnknownColumn,
        };
        Self::new(err.message, kind)
    }
}

impl From<smartlist_proto::Error> for CompileError {
    fn from(err: smartlist_proto::Error) -> Self {
        match err {
            smartlist_proto::Error::NotScalar(_) => Self::invalid_value(err.to_string()),
            smartlist_proto::Error::Json(_) => Self::invalid_rule(err.to_string()),
        }
    }
}
