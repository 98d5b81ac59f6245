//! Running compiled queries against a SQLite catalog.

use crate::error::CliError;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};
use smartlist_core::SchemaBundle;
use smartlist_proto::{Query, Value};
use std::path::Path;
use tracing::{debug, info};

/// Rows returned by executing a query.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    /// Column names, in select order.
    pub columns: Vec<String>,
    /// Row values, one entry per column.
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if no rows matched.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Open a catalog database.
pub fn open(path: &Path) -> Result<Connection, CliError> {
    info!(path = %path.display(), "Opening catalog database");
    Ok(Connection::open(path)?)
}

/// Create the tables of every entity in `schema`.
pub fn create_tables(conn: &Connection, schema: &SchemaBundle) -> Result<(), CliError> {
    for entity in schema.entities.values() {
        conn.execute(&entity.create_table_sql(), [])?;
    }
    Ok(())
}

/// Execute a compiled query and collect its rows.
pub fn execute(conn: &Connection, query: &Query) -> Result<ResultSet, CliError> {
    let sql = query.to_sql();
    debug!(sql = %sql, bindings = query.bindings.len(), "Executing query");

    let mut stmt = conn.prepare(&sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = stmt.query(params_from_iter(query.bindings.iter().map(to_sql_value)))?;
    let mut result = Vec::new();
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(columns.len());
        for idx in 0..columns.len() {
            values.push(from_sql_value(row.get(idx)?));
        }
        result.push(values);
    }

    debug!(rows = result.len(), "Query complete");
    Ok(ResultSet {
        columns,
        rows: result,
    })
}

/// Convert a bound value to its SQLite representation.
fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Int(i) => SqlValue::Integer(*i),
        Value::Float(f) => SqlValue::Real(*f),
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Timestamp(_) => SqlValue::Text(value.to_string()),
    }
}

fn from_sql_value(value: SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(i) => Value::Int(i),
        SqlValue::Real(f) => Value::Float(f),
        SqlValue::Text(s) => Value::String(s),
        SqlValue::Blob(b) => Value::String(format!("<{} bytes>", b.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use smartlist_core::library_schema;
    use smartlist_lang::{compile, inject_user_rules, parse};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2018, 7, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn, &library_schema()).unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO "artists" VALUES (1, 'Bar', NULL, '2018-01-01 00:00:00', '2018-01-01 00:00:00');
            INSERT INTO "artists" VALUES (2, 'Baz', NULL, '2018-01-01 00:00:00', '2018-01-01 00:00:00');
            INSERT INTO "albums" VALUES (1, 1, 'First', NULL, 0, '2018-01-01 00:00:00', '2018-01-01 00:00:00');
            INSERT INTO "songs" ("id", "album_id", "artist_id", "title", "length", "path", "mtime", "genre", "bit_rate", "created_at", "updated_at")
                VALUES ('s1', 1, 1, 'Foo', 200.0, '/s1.mp3', 0, 'Jazz', 128, '2018-07-12 09:00:00', '2018-07-12 09:00:00');
            INSERT INTO "songs" ("id", "album_id", "artist_id", "title", "length", "path", "mtime", "genre", "bit_rate", "created_at", "updated_at")
                VALUES ('s2', 1, 2, 'Foo', 320.0, '/s2.mp3', 0, 'Metal', 256, '2018-06-01 09:00:00', '2018-06-01 09:00:00');
            INSERT INTO "songs" ("id", "album_id", "artist_id", "title", "length", "path", "mtime", "genre", "bit_rate", "created_at", "updated_at")
                VALUES ('s3', 1, 2, 'Qux', 180.0, '/s3.mp3', 0, 'Jazz', 320, '2018-07-14 09:00:00', '2018-07-14 09:00:00');
            INSERT INTO "interactions" VALUES (1, 1, 's1', 1, 12, NULL, '2018-07-12 10:00:00', '2018-07-12 10:00:00');
            INSERT INTO "interactions" VALUES (2, 2, 's3', 1, 40, NULL, '2018-07-14 10:00:00', '2018-07-14 10:00:00');
            "#,
        )
        .unwrap();
        conn
    }

    fn song_ids(conn: &Connection, source: &str, user: Option<i64>) -> Vec<String> {
        let schema = library_schema();
        let mut tree = parse(source).unwrap();
        if let Some(id) = user {
            tree = inject_user_rules(&tree, id);
        }
        let query = compile(&tree, &schema, "songs", now()).unwrap();
        let result = execute(conn, &query).unwrap();
        assert_eq!(result.columns[0], "id");
        let mut ids: Vec<String> = result.rows.iter().map(|row| row[0].to_string()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_relation_rule() {
        let conn = setup();
        let ids = song_ids(
            &conn,
            r#"[{"rules": [
                {"model": "title", "operator": "is", "value": ["Foo"]},
                {"model": "artist.name", "operator": "isNot", "value": ["Bar"]}
            ]}]"#,
            None,
        );
        assert_eq!(ids, vec!["s2"]);
    }

    #[test]
    fn test_in_last() {
        let conn = setup();
        let ids = song_ids(
            &conn,
            r#"[{"rules": [{"model": "created_at", "operator": "inLast", "value": [7]}]}]"#,
            None,
        );
        assert_eq!(ids, vec!["s1", "s3"]);
    }

    #[test]
    fn test_numeric_string_value() {
        let conn = setup();
        let ids = song_ids(
            &conn,
            r#"[{"rules": [{"model": "bit_rate", "operator": "isGreaterThan", "value": ["128"]}]}]"#,
            None,
        );
        assert_eq!(ids, vec!["s2", "s3"]);
    }

    #[test]
    fn test_groups_are_ored() {
        let conn = setup();
        let ids = song_ids(
            &conn,
            r#"[
                {"rules": [{"model": "title", "operator": "is", "value": ["Qux"]}]},
                {"rules": [{"model": "genre", "operator": "beginsWith", "value": ["Met"]}]}
            ]"#,
            None,
        );
        assert_eq!(ids, vec!["s2", "s3"]);
    }

    #[test]
    fn test_empty_tree_matches_nothing() {
        let conn = setup();
        assert!(song_ids(&conn, "[]", None).is_empty());
    }

    #[test]
    fn test_user_scope() {
        let conn = setup();
        let rules = r#"[{"rules": [{"model": "interactions.play_count", "operator": "isGreaterThan", "value": [10]}]}]"#;

        assert_eq!(song_ids(&conn, rules, None), vec!["s1", "s3"]);
        assert_eq!(song_ids(&conn, rules, Some(1)), vec!["s1"]);
        assert_eq!(song_ids(&conn, rules, Some(2)), vec!["s3"]);
        assert!(song_ids(&conn, rules, Some(3)).is_empty());
    }

    #[test]
    fn test_result_columns() {
        let conn = setup();
        let query = Query::new("artists", "(\"name\" = ?)", vec![Value::from("Baz")]);
        let result = execute(&conn, &query).unwrap();

        assert_eq!(result.columns[..2], ["id".to_string(), "name".to_string()]);
        assert_eq!(result.len(), 1);
        assert_eq!(result.rows[0][0], Value::Int(2));
        assert_eq!(result.rows[0][2], Value::Null);
    }
}
