//! Validated rule nodes.
//!
//! A [`RuleTree`] is an OR of [`RuleGroup`]s, each an AND of [`Rule`]s. Trees
//! are built from raw records and validated on construction: operators must be
//! registered and every rule must carry exactly as many values as its operator
//! takes. Groups without rules are dropped, since an empty AND chain would
//! make its whole OR branch match everything.

use crate::error::CompileError;
use crate::operator::Operator;
use smartlist_proto::{RawRule, RawRuleGroup, RawRuleTree, Value};
use tracing::debug;

/// A single filter condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    field: String,
    operator: Operator,
    values: Vec<Value>,
}

impl Rule {
    /// Create a rule, checking the value count against the operator's arity.
    pub fn new(
        field: impl Into<String>,
        operator: Operator,
        values: Vec<Value>,
    ) -> Result<Self, CompileError> {
        if values.len() != operator.arity() {
            return Err(CompileError::invalid_arity(
                operator.name(),
                operator.arity(),
                values.len(),
            ));
        }
        Ok(Self {
            field: field.into(),
            operator,
            values,
        })
    }

    /// Create an equality rule.
    pub fn is(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator: Operator::Is,
            values: vec![value.into()],
        }
    }

    /// Validate a raw rule record.
    pub fn from_raw(raw: &RawRule) -> Result<Self, CompileError> {
        let operator = Operator::lookup(&raw.operator)?;
        let values = raw
            .values()
            .into_iter()
            .map(Value::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&raw.model, operator, values)
    }

    /// Convert back to a raw record.
    pub fn to_raw(&self) -> RawRule {
        RawRule::new(
            &self.field,
            self.operator.name(),
            self.values.iter().map(serde_json::Value::from).collect(),
        )
    }

    /// Field path (`column` or `relation.column`).
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The rule's operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The rule's values, as authored.
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// Rules combined with AND.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuleGroup {
    rules: Vec<Rule>,
    /// Position in the raw tree this group was validated from.
    source_index: Option<usize>,
}

impl RuleGroup {
    /// Create a group from rules.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            source_index: None,
        }
    }

    /// Append a rule as the last condition of the group.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Validate a raw group. `group` is its index, used in error locations.
    fn from_raw(raw: &RawRuleGroup, group: usize) -> Result<Self, CompileError> {
        raw.rules
            .iter()
            .enumerate()
            .map(|(i, r)| Rule::from_raw(r).map_err(|e| e.at(group, i)))
            .collect::<Result<Vec<_>, _>>()
            .map(|rules| Self {
                rules,
                source_index: Some(group),
            })
    }

    /// Index of the group in the raw tree it came from, if any.
    ///
    /// Empty groups are dropped from a [`RuleTree`], so this can differ from
    /// the group's position in [`RuleTree::groups`].
    pub fn source_index(&self) -> Option<usize> {
        self.source_index
    }

    /// Convert back to a raw record.
    pub fn to_raw(&self) -> RawRuleGroup {
        RawRuleGroup::new(self.rules.iter().map(Rule::to_raw).collect())
    }

    /// Rules in the group, in order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the group has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Groups combined with OR.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuleTree {
    groups: Vec<RuleGroup>,
}

impl RuleTree {
    /// Create a tree from groups, dropping empty ones.
    pub fn new(groups: Vec<RuleGroup>) -> Self {
        let total = groups.len();
        let groups: Vec<RuleGroup> = groups.into_iter().filter(|g| !g.is_empty()).collect();
        if groups.len() < total {
            debug!(dropped = total - groups.len(), "dropped empty rule groups");
        }
        Self { groups }
    }

    /// Validate a raw tree.
    pub fn from_raw(raw: &RawRuleTree) -> Result<Self, CompileError> {
        raw.groups
            .iter()
            .enumerate()
            .map(|(i, g)| RuleGroup::from_raw(g, i))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    /// Parse and validate a tree from its JSON form.
    pub fn from_json(source: &str) -> Result<Self, CompileError> {
        let raw = RawRuleTree::from_json(source)?;
        Self::from_raw(&raw)
    }

    /// Convert back to a raw record.
    pub fn to_raw(&self) -> RawRuleTree {
        RawRuleTree::new(self.groups.iter().map(RuleGroup::to_raw).collect())
    }

    /// Groups in the tree, in order.
    pub fn groups(&self) -> &[RuleGroup] {
        &self.groups
    }

    /// Total number of rules.
    pub fn rule_count(&self) -> usize {
        self.groups.iter().map(RuleGroup::len).sum()
    }

    /// Check if the tree has no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Operators used anywhere in the tree.
    pub fn operators(&self) -> impl Iterator<Item = Operator> + '_ {
        self.groups
            .iter()
            .flat_map(|g| g.rules.iter().map(Rule::operator))
    }
}
