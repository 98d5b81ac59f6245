//! Entity definitions.

use super::field::FieldDef;
use super::types::ScalarType;
use smartlist_proto::query::quote_ident;

/// An entity definition. The entity name is also its table name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDef {
    /// Entity (table) name, unique within the schema.
    pub name: String,
    /// Name of the primary identity column.
    pub identity_field: String,
    /// Column definitions, in table order.
    pub fields: Vec<FieldDef>,
}

impl EntityDef {
    /// Create a new entity definition.
    pub fn new(name: impl Into<String>, identity_field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identity_field: identity_field.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field to the entity.
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a non-nullable column.
    pub fn column(self, name: impl Into<String>, scalar: ScalarType) -> Self {
        self.with_field(FieldDef::new(name, scalar))
    }

    /// Add a nullable column.
    pub fn optional_column(self, name: impl Into<String>, scalar: ScalarType) -> Self {
        self.with_field(FieldDef::optional(name, scalar))
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check if the entity has a column.
    pub fn has_field(&self, name: &str) -> bool {
        self.get_field(name).is_some()
    }

    /// Get the identity field definition.
    pub fn get_identity_field(&self) -> Option<&FieldDef> {
        self.get_field(&self.identity_field)
    }

    /// DDL for a backing table with this entity's columns.
    pub fn create_table_sql(&self) -> String {
        let columns: Vec<String> = self
            .fields
            .iter()
            .map(|f| {
                let mut column = format!("{} {}", quote_ident(&f.name), f.scalar.sql_type());
                if f.name == self.identity_field {
                    column.push_str(" PRIMARY KEY");
                } else if !f.nullable {
                    column.push_str(" NOT NULL");
                }
                column
            })
            .collect();
        format!(
            "CREATE TABLE {} ({})",
            quote_ident(&self.name),
            columns.join(", ")
        )
    }
}
