//! Smartlist wire types.
//!
//! This crate defines the types that cross the boundary of the rule compiler:
//! the raw rule records clients send and playlists store, the scalar values
//! bound to placeholders, and the compiled query handed to the storage layer.
//!
//! # Modules
//!
//! - [`rule`] - Raw rule tree records (JSON)
//! - [`value`] - Scalar values bound to placeholders
//! - [`query`] - Compiled query output
//! - [`error`] - Protocol error types

pub mod error;
pub mod query;
pub mod rule;
pub mod value;

pub use error::Error;

// Re-export commonly used types at crate root
pub use query::{Query, ALWAYS_FALSE};
pub use rule::{RawRule, RawRuleGroup, RawRuleTree};
pub use value::Value;
