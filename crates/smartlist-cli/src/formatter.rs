//! Output formatters for compiled queries, result rows and the catalog.

use crate::executor::ResultSet;
use clap::ValueEnum;
use comfy_table::{Cell, Table};
use smartlist_core::SchemaBundle;
use smartlist_proto::{Query, Value};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// SQL text with bindings
    Sql,
    /// JSON format
    Json,
    /// ASCII table format
    Table,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Sql => write!(f, "sql"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter: Send + Sync {
    /// Format a compiled query.
    fn format_query(&self, query: &Query) -> String;

    /// Format rows returned by executing a query.
    fn format_result(&self, result: &ResultSet) -> String;

    /// Format the catalog schema.
    fn format_schema(&self, schema: &SchemaBundle) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Sql => Box::new(SqlFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Table => Box::new(TableFormatter),
    }
}

/// SQL formatter: statement text, bindings as a trailing comment, DDL for schemas.
pub struct SqlFormatter;

impl Formatter for SqlFormatter {
    fn format_query(&self, query: &Query) -> String {
        let bindings: Vec<String> = query.bindings.iter().map(sql_literal).collect();
        format!(
            "{};\n-- bindings: [{}]",
            query.to_sql(),
            bindings.join(", ")
        )
    }

    fn format_result(&self, result: &ResultSet) -> String {
        TableFormatter.format_result(result)
    }

    fn format_schema(&self, schema: &SchemaBundle) -> String {
        schema
            .entities
            .values()
            .map(|e| format!("{};", e.create_table_sql()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_query(&self, query: &Query) -> String {
        let json = serde_json::json!({
            "sql": query.to_sql(),
            "base_table": query.base_table,
            "predicate": query.predicate,
            "bindings": query.bindings.iter().map(serde_json::Value::from).collect::<Vec<_>>(),
        });
        serde_json::to_string_pretty(&json).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_result(&self, result: &ResultSet) -> String {
        let rows: Vec<serde_json::Value> = result
            .rows
            .iter()
            .map(|row| {
                let obj: serde_json::Map<String, serde_json::Value> = result
                    .columns
                    .iter()
                    .zip(row)
                    .map(|(col, val)| (col.clone(), serde_json::Value::from(val)))
                    .collect();
                serde_json::Value::Object(obj)
            })
            .collect();
        serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_schema(&self, schema: &SchemaBundle) -> String {
        let entities: serde_json::Map<String, serde_json::Value> = schema
            .entities
            .values()
            .map(|e| {
                let fields: Vec<serde_json::Value> = e
                    .fields
                    .iter()
                    .map(|f| {
                        serde_json::json!({
                            "name": f.name,
                            "type": f.scalar.to_string(),
                            "nullable": f.nullable,
                        })
                    })
                    .collect();
                (
                    e.name.clone(),
                    serde_json::json!({ "identity": e.identity_field, "fields": fields }),
                )
            })
            .collect();

        let relations: Vec<serde_json::Value> = schema
            .relations
            .iter()
            .map(|r| {
                serde_json::json!({
                    "name": r.name,
                    "from": format!("{}.{}", r.from_entity, r.from_field),
                    "to": format!("{}.{}", r.to_entity, r.to_field),
                    "cardinality": r.cardinality.to_string(),
                })
            })
            .collect();

        let json = serde_json::json!({
            "version": schema.version,
            "entities": entities,
            "relations": relations,
        });
        serde_json::to_string_pretty(&json).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_query(&self, query: &Query) -> String {
        let mut table = Table::new();
        table.set_header(vec!["#", "Value", "Type"]);
        for (i, value) in query.bindings.iter().enumerate() {
            table.add_row(vec![
                Cell::new(i + 1),
                Cell::new(value.to_string()),
                Cell::new(value.type_name()),
            ]);
        }

        if query.bindings.is_empty() {
            query.to_sql()
        } else {
            format!("{}\n\n{}", query.to_sql(), table)
        }
    }

    fn format_result(&self, result: &ResultSet) -> String {
        if result.is_empty() {
            return "No results".to_string();
        }

        let mut table = Table::new();
        table.set_header(&result.columns);
        for row in &result.rows {
            table.add_row(row.iter().map(|v| Cell::new(v.to_string())));
        }

        format!("{}\n({} row(s))", table, result.len())
    }

    fn format_schema(&self, schema: &SchemaBundle) -> String {
        let mut entities = Table::new();
        entities.set_header(vec!["Entity", "Column", "Type", "Nullable"]);
        for entity in schema.entities.values() {
            for field in &entity.fields {
                entities.add_row(vec![
                    entity.name.clone(),
                    field.name.clone(),
                    field.scalar.to_string(),
                    if field.nullable { "yes" } else { "no" }.to_string(),
                ]);
            }
        }

        let mut relations = Table::new();
        relations.set_header(vec!["Relation", "From", "To", "Cardinality"]);
        for r in &schema.relations {
            relations.add_row(vec![
                format!("{}.{}", r.from_entity, r.name),
                format!("{}.{}", r.from_entity, r.from_field),
                format!("{}.{}", r.to_entity, r.to_field),
                r.cardinality.to_string(),
            ]);
        }

        format!("{}\n\n{}", entities, relations)
    }
}

/// Render a binding as a SQL literal for display.
fn sql_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        Value::Int(_) | Value::Float(_) => value.to_string(),
        Value::String(_) | Value::Timestamp(_) => {
            format!("'{}'", value.to_string().replace('\'', "''"))
        }
    }
}
