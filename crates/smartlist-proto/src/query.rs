//! Compiled query output.

use serde::Serialize;

use crate::value::Value;

/// Predicate that never matches a row.
pub const ALWAYS_FALSE: &str = "0 = 1";

/// Positional placeholder used in predicate text.
pub const PLACEHOLDER: &str = "?";

/// Quote an identifier with double quotes, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// A parameterized WHERE-clause body over a base table.
///
/// `predicate` uses positional `?` placeholders; `bindings` holds one value per
/// placeholder in order. Identical rule trees produce byte-identical text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    /// Table of the base entity.
    pub base_table: String,
    /// WHERE-clause body.
    pub predicate: String,
    /// Values for the placeholders, in order.
    pub bindings: Vec<Value>,
}

impl Query {
    /// Create a query.
    pub fn new(
        base_table: impl Into<String>,
        predicate: impl Into<String>,
        bindings: Vec<Value>,
    ) -> Self {
        Self {
            base_table: base_table.into(),
            predicate: predicate.into(),
            bindings,
        }
    }

    /// A query that matches nothing.
    pub fn always_false(base_table: impl Into<String>) -> Self {
        Self::new(base_table, ALWAYS_FALSE, Vec::new())
    }

    /// Check if this query matches nothing by construction.
    pub fn is_always_false(&self) -> bool {
        self.predicate == ALWAYS_FALSE
    }

    /// Number of placeholders in the predicate.
    pub fn placeholder_count(&self) -> usize {
        self.predicate.matches(PLACEHOLDER).count()
    }

    /// Full select statement over the base table.
    pub fn to_sql(&self) -> String {
        format!(
            "select * from {} where {}",
            quote_ident(&self.base_table),
            self.predicate
        )
    }
}
