//! Relation definitions between entities.

use std::fmt;

/// Cardinality of a relation, seen from its source entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Many source rows point at one target row (foreign key on the source).
    ManyToOne,
    /// One source row is referenced by many target rows (foreign key on the target).
    OneToMany,
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::ManyToOne => write!(f, "many-to-one"),
            Cardinality::OneToMany => write!(f, "one-to-many"),
        }
    }
}

/// A named, one-hop relation from a source entity to a target entity.
///
/// Rows are related when `from_entity.from_field = to_entity.to_field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDef {
    /// Relation name, unique per source entity (the prefix in `artist.name`).
    pub name: String,
    /// Source entity name.
    pub from_entity: String,
    /// Join column on the source entity.
    pub from_field: String,
    /// Target entity name.
    pub to_entity: String,
    /// Join column on the target entity.
    pub to_field: String,
    /// Relation cardinality.
    pub cardinality: Cardinality,
}

impl RelationDef {
    /// Create a relation where the source holds the foreign key.
    pub fn belongs_to(
        name: impl Into<String>,
        from_entity: impl Into<String>,
        from_field: impl Into<String>,
        to_entity: impl Into<String>,
        to_field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            from_entity: from_entity.into(),
            from_field: from_field.into(),
            to_entity: to_entity.into(),
            to_field: to_field.into(),
            cardinality: Cardinality::ManyToOne,
        }
    }

    /// Create a relation where the target holds the foreign key.
    pub fn has_many(
        name: impl Into<String>,
        from_entity: impl Into<String>,
        from_field: impl Into<String>,
        to_entity: impl Into<String>,
        to_field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            from_entity: from_entity.into(),
            from_field: from_field.into(),
            to_entity: to_entity.into(),
            to_field: to_field.into(),
            cardinality: Cardinality::OneToMany,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_belongs_to_relation() {
        let rel = RelationDef::belongs_to("artist", "songs", "artist_id", "artists", "id");

        assert_eq!(rel.cardinality, Cardinality::ManyToOne);
        assert_eq!(rel.from_entity, "songs");
        assert_eq!(rel.to_entity, "artists");
        assert_eq!(rel.from_field, "artist_id");
    }

    #[test]
    fn test_has_many_relation() {
        let rel = RelationDef::has_many("interactions", "songs", "id", "interactions", "song_id");

        assert_eq!(rel.cardinality, Cardinality::OneToMany);
        assert_eq!(rel.to_field, "song_id");
        assert_eq!(rel.cardinality.to_string(), "one-to-many");
    }
}
