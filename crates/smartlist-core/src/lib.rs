//! Smartlist core: catalog metadata and field resolution.
//!
//! This crate provides:
//! - Catalog types describing entities, columns and relations
//! - The built-in music library schema
//! - The field resolver that maps rule field paths to local columns or joins

pub mod catalog;
pub mod error;
pub mod resolver;

pub use catalog::{library_schema, EntityDef, FieldDef, RelationDef, ScalarType, SchemaBundle};
pub use error::{ResolveError, ResolveErrorKind};
pub use resolver::{FieldResolver, ResolvedField};
