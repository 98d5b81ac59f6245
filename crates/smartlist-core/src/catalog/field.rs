//! Column definitions for entities.

use super::types::ScalarType;

/// A column of an entity's backing table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Column name.
    pub name: String,
    /// Column type.
    pub scalar: ScalarType,
    /// Whether the column may hold NULL.
    pub nullable: bool,
}

impl FieldDef {
    /// Create a new non-nullable column.
    pub fn new(name: impl Into<String>, scalar: ScalarType) -> Self {
        Self {
            name: name.into(),
            scalar,
            nullable: false,
        }
    }

    /// Create a nullable column.
    pub fn optional(name: impl Into<String>, scalar: ScalarType) -> Self {
        Self {
            name: name.into(),
            scalar,
            nullable: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_def_builder() {
        let field = FieldDef::new("title", ScalarType::String);
        assert_eq!(field.name, "title");
        assert!(!field.nullable);

        let field = FieldDef::optional("lyrics", ScalarType::String);
        assert!(field.nullable);
    }
}
