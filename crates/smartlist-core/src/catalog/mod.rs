//! Catalog metadata for the media library.
//!
//! The catalog describes entities (tables), their columns, and the one-hop
//! relations rules may reach through. It is static: built once and shared
//! read-only by every compilation.

mod entity;
mod field;
mod library;
mod relation;
mod schema;
mod types;

pub use entity::EntityDef;
pub use field::FieldDef;
pub use library::{library_schema, ALBUMS, ARTISTS, INTERACTIONS, LIBRARY_SCHEMA_VERSION, SONGS};
pub use relation::{Cardinality, RelationDef};
pub use schema::SchemaBundle;
pub use types::ScalarType;
