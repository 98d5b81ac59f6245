//! Schema bundle - the static entity and relation metadata rules resolve against.

use super::{EntityDef, RelationDef};
use crate::error::ResolveError;
use std::collections::BTreeMap;

/// A versioned snapshot of the catalog schema.
///
/// Read-only once built; compilations share it by reference.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaBundle {
    /// Schema version.
    pub version: u64,
    /// Entity definitions keyed by name.
    pub entities: BTreeMap<String, EntityDef>,
    /// Relation definitions, in declaration order.
    pub relations: Vec<RelationDef>,
}

impl SchemaBundle {
    /// Create an empty schema bundle.
    pub fn new(version: u64) -> Self {
        Self {
            version,
            entities: BTreeMap::new(),
            relations: Vec::new(),
        }
    }

    /// Add an entity to the schema.
    pub fn with_entity(mut self, entity: EntityDef) -> Self {
        self.entities.insert(entity.name.clone(), entity);
        self
    }

    /// Add a relation to the schema.
    pub fn with_relation(mut self, relation: RelationDef) -> Self {
        self.relations.push(relation);
        self
    }

    /// Get an entity by name.
    pub fn get_entity(&self, name: &str) -> Option<&EntityDef> {
        self.entities.get(name)
    }

    /// Get a relation by its source entity and name.
    pub fn get_relation(&self, from_entity: &str, name: &str) -> Option<&RelationDef> {
        self.relations
            .iter()
            .find(|r| r.from_entity == from_entity && r.name == name)
    }

    /// Get all relations for an entity (as source).
    pub fn relations_from(&self, entity: &str) -> Vec<&RelationDef> {
        self.relations
            .iter()
            .filter(|r| r.from_entity == entity)
            .collect()
    }

    /// List all entity names, sorted.
    pub fn entity_names(&self) -> Vec<&str> {
        self.entities.keys().map(|s| s.as_str()).collect()
    }

    /// Check that every entity has its identity column and every relation
    /// joins existing columns of existing entities.
    pub fn validate(&self) -> Result<(), ResolveError> {
        for entity in self.entities.values() {
            if entity.get_identity_field().is_none() {
                return Err(ResolveError::unknown_column(&entity.name, &entity.identity_field));
            }
        }

        for relation in &self.relations {
            let from = self
                .get_entity(&relation.from_entity)
                .ok_or_else(|| ResolveError::unknown_entity(&relation.from_entity))?;
            let to = self
                .get_entity(&relation.to_entity)
                .ok_or_else(|| ResolveError::unknown_entity(&relation.to_entity))?;

            if !from.has_field(&relation.from_field) {
                return Err(ResolveError::unknown_column(&from.name, &relation.from_field));
            }
            if !to.has_field(&relation.to_field) {
                return Err(ResolveError::unknown_column(&to.name, &relation.to_field));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ScalarType;
    use crate::error::ResolveErrorKind;

    fn sample_schema() -> SchemaBundle {
        let artists = EntityDef::new("artists", "id")
            .column("id", ScalarType::Int)
            .column("name", ScalarType::String);

        let songs = EntityDef::new("songs", "id")
            .column("id", ScalarType::String)
            .column("title", ScalarType::String)
            .column("artist_id", ScalarType::Int);

        SchemaBundle::new(1)
            .with_entity(artists)
            .with_entity(songs)
            .with_relation(RelationDef::belongs_to(
                "artist", "songs", "artist_id", "artists", "id",
            ))
    }

    #[test]
    fn test_lookup() {
        let schema = sample_schema();
        assert_eq!(schema.entity_names(), vec!["artists", "songs"]);
        assert!(schema.get_relation("songs", "artist").is_some());
        assert!(schema.get_relation("artists", "artist").is_none());
        assert_eq!(schema.relations_from("songs").len(), 1);
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_dangling_relation() {
        let schema = sample_schema().with_relation(RelationDef::belongs_to(
            "album", "songs", "album_id", "albums", "id",
        ));
        let err = schema.validate().unwrap_err();
        assert_eq!(err.kind, ResolveErrorKind::UnknownEntity);

        let schema = sample_schema().with_relation(RelationDef::belongs_to(
            "singer", "songs", "singer_id", "artists", "id",
        ));
        let err = schema.validate().unwrap_err();
        assert_eq!(err.kind, ResolveErrorKind::UnknownColumn);
    }

    #[test]
    fn test_validate_rejects_missing_identity() {
        let schema = sample_schema()
            .with_entity(EntityDef::new("albums", "id").column("name", ScalarType::String));
        let err = schema.validate().unwrap_err();
        assert_eq!(err.kind, ResolveErrorKind::UnknownColumn);
    }
}
