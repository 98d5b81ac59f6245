//! Smartlist rule language
//!
//! This crate validates smart playlist rule trees and compiles them into
//! parameterized queries against the media catalog.
//!
//! # Rule Trees
//!
//! ```text
//! [
//!   { "rules": [ { "model": "title",       "operator": "is",    "value": ["Foo"] },
//!                { "model": "artist.name", "operator": "isNot", "value": ["Bar"] } ] },
//!   { "rules": [ { "model": "created_at",  "operator": "inLast", "value": [7] } ] }
//! ]
//! ```
//!
//! Rules in a group are AND-ed; groups are OR-ed. A `model` is either a column
//! of the base entity or `relation.column` on a directly related entity; the
//! latter compiles to a correlated `exists (...)` subquery.
//!
//! # Pipeline
//!
//! raw JSON → [`RuleTree`] → [`inject_user_rules`] (when a user is known) →
//! [`Compiler`] → [`Query`].
//!
//! # Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use smartlist_core::library_schema;
//! use smartlist_lang::parse_and_compile;
//!
//! let schema = library_schema();
//! let now = NaiveDate::from_ymd_opt(2018, 7, 15)
//!     .unwrap()
//!     .and_hms_opt(0, 0, 0)
//!     .unwrap();
//!
//! let query = parse_and_compile(
//!     r#"[{"rules": [{"model": "title", "operator": "contains", "value": ["Foo"]}]}]"#,
//!     &schema,
//!     "songs",
//!     now,
//!     None,
//! )
//! .unwrap();
//!
//! assert_eq!(query.predicate, r#"("title" LIKE ?)"#);
//! ```

pub mod compiler;
pub mod error;
pub mod inject;
pub mod operator;
pub mod rule;
pub mod sql;

// Re-export main types
pub use compiler::Compiler;
pub use error::{CompileError, CompileErrorKind, RuleLocation};
pub use inject::{inject_user_rules, USER_SCOPE_FIELD};
pub use operator::Operator;
pub use rule::{Rule, RuleGroup, RuleTree};
pub use smartlist_proto::{Query, Value};

use chrono::NaiveDateTime;
use smartlist_core::SchemaBundle;

/// Parse and validate a rule tree from JSON.
///
/// # Example
///
/// ```rust
/// use smartlist_lang::parse;
///
/// let tree = parse(r#"[{"rules": [{"model": "genre", "operator": "is", "value": ["Metal"]}]}]"#)
///     .unwrap();
/// assert_eq!(tree.rule_count(), 1);
/// ```
pub fn parse(source: &str) -> Result<RuleTree, CompileError> {
    RuleTree::from_json(source)
}

/// Compile a validated tree against `base_entity`.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use smartlist_core::library_schema;
/// use smartlist_lang::{compile, parse};
///
/// let schema = library_schema();
/// let now = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let tree = parse("[]").unwrap();
///
/// let query = compile(&tree, &schema, "songs", now).unwrap();
/// assert!(query.is_always_false());
/// ```
pub fn compile(
    tree: &RuleTree,
    schema: &SchemaBundle,
    base_entity: &str,
    now: NaiveDateTime,
) -> Result<Query, CompileError> {
    Compiler::new(schema, base_entity, now)?.compile(tree)
}

/// Parse, scope to `user_id` when given, and compile in one step.
pub fn parse_and_compile(
    source: &str,
    schema: &SchemaBundle,
    base_entity: &str,
    now: NaiveDateTime,
    user_id: Option<i64>,
) -> Result<Query, CompileError> {
    let tree = parse(source)?;
    let tree = match user_id {
        Some(id) => inject_user_rules(&tree, id),
        None => tree,
    };
    compile(&tree, schema, base_entity, now)
}
