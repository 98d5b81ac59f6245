//! The built-in music library catalog.

use super::{EntityDef, RelationDef, ScalarType, SchemaBundle};

/// Base entity smart playlists select from.
pub const SONGS: &str = "songs";
/// Album entity.
pub const ALBUMS: &str = "albums";
/// Artist entity.
pub const ARTISTS: &str = "artists";
/// Per-user play data.
pub const INTERACTIONS: &str = "interactions";

/// Schema version of [`library_schema`].
pub const LIBRARY_SCHEMA_VERSION: u64 = 1;

/// Build the music library schema: songs with their artist, album and
/// per-user interactions.
pub fn library_schema() -> SchemaBundle {
    let songs = EntityDef::new(SONGS, "id")
        .column("id", ScalarType::String)
        .column("album_id", ScalarType::Int)
        .column("artist_id", ScalarType::Int)
        .column("title", ScalarType::String)
        .column("length", ScalarType::Float)
        .optional_column("track", ScalarType::Int)
        .optional_column("disc", ScalarType::Int)
        .optional_column("lyrics", ScalarType::String)
        .column("path", ScalarType::String)
        .column("mtime", ScalarType::Int)
        .optional_column("genre", ScalarType::String)
        .optional_column("year", ScalarType::Int)
        .optional_column("bit_rate", ScalarType::Int)
        .column("created_at", ScalarType::Timestamp)
        .column("updated_at", ScalarType::Timestamp);

    let albums = EntityDef::new(ALBUMS, "id")
        .column("id", ScalarType::Int)
        .column("artist_id", ScalarType::Int)
        .column("name", ScalarType::String)
        .optional_column("cover", ScalarType::String)
        .column("is_compilation", ScalarType::Bool)
        .column("created_at", ScalarType::Timestamp)
        .column("updated_at", ScalarType::Timestamp);

    let artists = EntityDef::new(ARTISTS, "id")
        .column("id", ScalarType::Int)
        .column("name", ScalarType::String)
        .optional_column("image", ScalarType::String)
        .column("created_at", ScalarType::Timestamp)
        .column("updated_at", ScalarType::Timestamp);

    let interactions = EntityDef::new(INTERACTIONS, "id")
        .column("id", ScalarType::Int)
        .column("user_id", ScalarType::Int)
        .column("song_id", ScalarType::String)
        .column("liked", ScalarType::Bool)
        .column("play_count", ScalarType::Int)
        .optional_column("last_played_at", ScalarType::Timestamp)
        .column("created_at", ScalarType::Timestamp)
        .column("updated_at", ScalarType::Timestamp);

    SchemaBundle::new(LIBRARY_SCHEMA_VERSION)
        .with_entity(songs)
        .with_entity(albums)
        .with_entity(artists)
        .with_entity(interactions)
        .with_relation(RelationDef::belongs_to(
            "artist", SONGS, "artist_id", ARTISTS, "id",
        ))
        .with_relation(RelationDef::belongs_to(
            "album", SONGS, "album_id", ALBUMS, "id",
        ))
        .with_relation(RelationDef::has_many(
            "interactions",
            SONGS,
            "id",
            INTERACTIONS,
            "song_id",
        ))
        .with_relation(RelationDef::belongs_to(
            "artist", ALBUMS, "artist_id", ARTISTS, "id",
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_schema_is_consistent() {
        let schema = library_schema();
        assert!(schema.validate().is_ok());
        assert_eq!(schema.entity_names().len(), 4);
        assert_eq!(schema.relations_from(SONGS).len(), 3);
        assert_eq!(schema.relations_from(ALBUMS).len(), 1);
    }

    #[test]
    fn test_interactions_scope_column() {
        let schema = library_schema();
        let interactions = schema.get_entity(INTERACTIONS).unwrap();
        assert!(interactions.has_field("user_id"));
        assert!(interactions.has_field("play_count"));
    }
}
