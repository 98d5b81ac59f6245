//! Field resolution: dotted rule field paths to columns and joins.

use crate::catalog::{RelationDef, SchemaBundle};
use crate::error::ResolveError;
use tracing::trace;

/// Separator between a relation name and a column in a field path.
pub const PATH_SEPARATOR: char = '.';

/// Where a rule field lives relative to the base entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedField<'s> {
    /// A column on the base entity itself.
    Local {
        /// Column name.
        column: &'s str,
    },
    /// A column on a directly related entity.
    Foreign {
        /// Relation joining the base entity to the related one.
        relation: &'s RelationDef,
        /// Column on the related entity.
        column: &'s str,
    },
}

impl<'s> ResolvedField<'s> {
    /// Check if the field is a column of the base entity.
    pub fn is_local(&self) -> bool {
        matches!(self, ResolvedField::Local { .. })
    }

    /// The column the operator applies to.
    pub fn column(&self) -> &'s str {
        match self {
            ResolvedField::Local { column } | ResolvedField::Foreign { column, .. } => column,
        }
    }

    /// The relation, for foreign fields.
    pub fn relation(&self) -> Option<&'s RelationDef> {
        match self {
            ResolvedField::Local { .. } => None,
            ResolvedField::Foreign { relation, .. } => Some(relation),
        }
    }
}

/// Resolves field paths against a schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldResolver<'s> {
    schema: &'s SchemaBundle,
}

impl<'s> FieldResolver<'s> {
    /// Create a resolver over a schema.
    pub fn new(schema: &'s SchemaBundle) -> Self {
        Self { schema }
    }

    /// Resolve `field` relative to `base_entity`.
    ///
    /// `column` resolves locally; `relation.column` resolves through a relation
    /// whose source is `base_entity`. Paths with more than one hop are rejected.
    pub fn resolve(
        &self,
        field: &str,
        base_entity: &str,
    ) -> Result<ResolvedField<'s>, ResolveError> {
        let base = self
            .schema
            .get_entity(base_entity)
            .ok_or_else(|| ResolveError::unknown_entity(base_entity))?;

        let resolved = match field.rsplit_once(PATH_SEPARATOR) {
            None => {
                let column = base
                    .get_field(field)
                    .ok_or_else(|| ResolveError::unknown_column(&base.name, field))?;
                ResolvedField::Local {
                    column: &column.name,
                }
            }
            Some((relation_name, column_name)) => {
                let relation = self
                    .schema
                    .get_relation(&base.name, relation_name)
                    .ok_or_else(|| ResolveError::unknown_relation(&base.name, relation_name))?;
                let target = self
                    .schema
                    .get_entity(&relation.to_entity)
                    .ok_or_else(|| ResolveError::unknown_entity(&relation.to_entity))?;
                let column = target
                    .get_field(column_name)
                    .ok_or_else(|| ResolveError::unknown_column(&target.name, column_name))?;
                ResolvedField::Foreign {
                    relation,
                    column: &column.name,
                }
            }
        };

        trace!(field, base_entity, local = resolved.is_local(), "resolved field");
        Ok(resolved)
    }
}
