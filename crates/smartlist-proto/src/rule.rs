//! Raw rule records as they are stored with a playlist and posted by clients.
//!
//! A rule tree on the wire is a JSON array of groups:
//!
//! ```json
//! [
//!   { "rules": [ { "model": "title", "operator": "is", "value": ["Foo"] } ] },
//!   { "rules": [ { "model": "artist.name", "operator": "contains", "value": ["Bar"] } ] }
//! ]
//! ```
//!
//! Rules inside a group are AND-ed, groups are OR-ed. These types only carry
//! the shape; operator and field validation happens at compile time.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A single rule record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRule {
    /// Field path, either `column` or `relation.column`.
    pub model: String,
    /// Operator name, e.g. `is` or `inLast`.
    pub operator: String,
    /// Rule values. Normally an array; a bare scalar is read as a single value.
    #[serde(default)]
    pub value: serde_json::Value,
}

impl RawRule {
    /// Create a rule record with an array of values.
    pub fn new(
        model: impl Into<String>,
        operator: impl Into<String>,
        values: Vec<serde_json::Value>,
    ) -> Self {
        Self {
            model: model.into(),
            operator: operator.into(),
            value: serde_json::Value::Array(values),
        }
    }

    /// The rule's values as a list.
    pub fn values(&self) -> Vec<&serde_json::Value> {
        match &self.value {
            serde_json::Value::Array(items) => items.iter().collect(),
            serde_json::Value::Null => Vec::new(),
            scalar => vec![scalar],
        }
    }
}

/// A group of rule records. Unknown keys (such as a client-side `id`) are ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawRuleGroup {
    /// Rules in this group.
    #[serde(default)]
    pub rules: Vec<RawRule>,
}

impl RawRuleGroup {
    /// Create a group from rule records.
    pub fn new(rules: Vec<RawRule>) -> Self {
        Self { rules }
    }

    /// Add a rule record.
    pub fn with_rule(mut self, rule: RawRule) -> Self {
        self.rules.push(rule);
        self
    }
}

/// A full rule tree as stored with a smart playlist.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRuleTree {
    /// Groups in this tree.
    pub groups: Vec<RawRuleGroup>,
}

impl RawRuleTree {
    /// Create a tree from groups.
    pub fn new(groups: Vec<RawRuleGroup>) -> Self {
        Self { groups }
    }

    /// Parse a tree from its JSON form.
    pub fn from_json(source: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(source)?)
    }

    /// Serialize the tree to JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    /// Total number of rule records across all groups.
    pub fn rule_count(&self) -> usize {
        self.groups.iter().map(|g| g.rules.len()).sum()
    }
}
