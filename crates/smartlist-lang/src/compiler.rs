//! Compiler from rule trees to parameterized queries.
//!
//! Rules in a group are AND-ed and parenthesized; groups are OR-ed:
//!
//! ```text
//! ("title" = ? and exists (select * from "artists"
//!     where "songs"."artist_id" = "artists"."id" and "name" <> ?)) or ("genre" = ?)
//! ```
//!
//! Bindings are appended in emission order: groups in order, rules in order,
//! values in order.

use crate::error::CompileError;
use crate::rule::{Rule, RuleGroup, RuleTree};
use crate::sql::{qualified, quote_ident};
use chrono::NaiveDateTime;
use smartlist_core::catalog::{EntityDef, RelationDef};
use smartlist_core::{FieldResolver, ResolvedField, SchemaBundle};
use smartlist_proto::{Query, Value};
use tracing::{debug, trace};

/// Compiles rule trees against one base entity of a schema.
///
/// A compiler holds only shared references and its reference instant, so it
/// is cheap to build per request.
#[derive(Debug, Clone, Copy)]
pub struct Compiler<'s> {
    resolver: FieldResolver<'s>,
    base: &'s EntityDef,
    now: NaiveDateTime,
}

impl<'s> Compiler<'s> {
    /// Create a compiler for `base_entity`.
    ///
    /// `now` is the reference instant for relative-date operators; it is used
    /// for every rule of every tree this compiler sees.
    pub fn new(
        schema: &'s SchemaBundle,
        base_entity: &str,
        now: NaiveDateTime,
    ) -> Result<Self, CompileError> {
        let base = schema
            .get_entity(base_entity)
            .ok_or_else(|| smartlist_core::ResolveError::unknown_entity(base_entity))?;
        Ok(Self {
            resolver: FieldResolver::new(schema),
            base,
            now,
        })
    }

    /// Compile a tree to a query.
    ///
    /// A tree without groups compiles to a predicate that matches nothing.
    pub fn compile(&self, tree: &RuleTree) -> Result<Query, CompileError> {
        if tree.is_empty() {
            debug!(base_entity = %self.base.name, "empty rule tree, matching nothing");
            return Ok(Query::always_false(&self.base.name));
        }

        let mut bindings = Vec::new();
        let mut groups = Vec::with_capacity(tree.groups().len());
        for (i, group) in tree.groups().iter().enumerate() {
            let index = group.source_index().unwrap_or(i);
            groups.push(self.compile_group(group, index, &mut bindings)?);
        }

        let predicate = groups.join(" or ");
        debug!(
            base_entity = %self.base.name,
            groups = groups.len(),
            bindings = bindings.len(),
            "compiled rule tree"
        );
        Ok(Query::new(&self.base.name, predicate, bindings))
    }

    /// Compile one group to `(pred1 and pred2 ...)`. `index` locates errors in
    /// the raw tree.
    fn compile_group(
        &self,
        group: &RuleGroup,
        index: usize,
        bindings: &mut Vec<Value>,
    ) -> Result<String, CompileError> {
        let predicates = group
            .rules()
            .iter()
            .enumerate()
            .map(|(i, rule)| self.compile_rule(rule, bindings).map_err(|e| e.at(index, i)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(format!("({})", predicates.join(" and ")))
    }

    /// Compile one rule, appending its bound values.
    fn compile_rule(
        &self,
        rule: &Rule,
        bindings: &mut Vec<Value>,
    ) -> Result<String, CompileError> {
        let resolved = self.resolver.resolve(rule.field(), &self.base.name)?;
        let operator = rule.operator();
        let values = operator.coerce(rule.values(), self.now)?;
        let predicate = operator.render(resolved.column());

        trace!(
            field = rule.field(),
            operator = operator.name(),
            local = resolved.is_local(),
            "compiled rule"
        );

        bindings.extend(values);
        Ok(match resolved {
            ResolvedField::Local { .. } => predicate,
            ResolvedField::Foreign { relation, .. } => self.exists(relation, &predicate),
        })
    }

    /// Wrap a predicate on a related entity in a correlated existence check.
    fn exists(&self, relation: &RelationDef, predicate: &str) -> String {
        format!(
            "exists (select * from {} where {} = {} and {})",
            quote_ident(&relation.to_entity),
            qualified(&self.base.name, &relation.from_field),
            qualified(&relation.to_entity, &relation.to_field),
            predicate
        )
    }
}
