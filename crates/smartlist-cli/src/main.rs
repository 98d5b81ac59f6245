//! Smartlist Command-Line Compiler
//!
//! Reads a smart playlist rule tree as JSON, compiles it against the music
//! library catalog and prints the parameterized query, or runs it against a
//! SQLite catalog and prints the matching rows.

mod config;
mod error;
mod executor;
mod formatter;

use clap::Parser;
use config::{Args, CliConfig, RulesSource};
use error::CliError;
use formatter::create_formatter;
use smartlist_core::{library_schema, SchemaBundle};
use smartlist_lang::{inject_user_rules, CompileError, Compiler, Query, RuleTree};
use smartlist_proto::RawRuleTree;
use std::io::Read;
use tracing::info;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("smartlist_cli=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = CliConfig::try_from(&args)?;

    let output = run(&config)?;
    println!("{}", output);
    Ok(())
}

/// Run one invocation and return what should be printed.
fn run(config: &CliConfig) -> Result<String, CliError> {
    let schema = library_schema();
    schema.validate().map_err(CompileError::from)?;
    let formatter = create_formatter(config.format);

    if config.show_schema {
        return Ok(formatter.format_schema(&schema));
    }

    let source = read_rules(&config.rules)?;
    let query = compile_rules(config, &schema, &source)?;

    match &config.database {
        Some(path) => {
            let conn = executor::open(path)?;
            let result = executor::execute(&conn, &query)?;
            info!(rows = result.len(), "Playlist resolved");
            Ok(formatter.format_result(&result))
        }
        None => Ok(formatter.format_query(&query)),
    }
}

/// Read the rule tree JSON from its source.
fn read_rules(source: &RulesSource) -> Result<String, CliError> {
    match source {
        RulesSource::File(path) => Ok(std::fs::read_to_string(path)?),
        RulesSource::Stdin => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Validate, scope and compile a rule tree.
fn compile_rules(
    config: &CliConfig,
    schema: &SchemaBundle,
    source: &str,
) -> Result<Query, CliError> {
    let raw = RawRuleTree::from_json(source).map_err(CompileError::from)?;
    let count = raw.rule_count();
    if count > config.max_rules {
        return Err(CliError::TooManyRules {
            count,
            max: config.max_rules,
        });
    }

    let mut tree = RuleTree::from_raw(&raw)?;
    if let Some(user_id) = config.user_id {
        tree = inject_user_rules(&tree, user_id);
    }

    let compiler = Compiler::new(schema, &config.base_entity, config.now)?;
    let query = compiler.compile(&tree)?;
    info!(
        entity = %config.base_entity,
        groups = tree.groups().len(),
        bindings = query.bindings.len(),
        "Compiled rule tree"
    );
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_now;
    use crate::formatter::OutputFormat;
    use pretty_assertions::assert_eq;
    use smartlist_lang::CompileErrorKind;
    use std::io::Write;

    const RULES: &str = r#"[{"rules": [
        {"model": "title", "operator": "is", "value": ["Foo"]},
        {"model": "artist.name", "operator": "isNot", "value": ["Bar"]}
    ]}]"#;

    fn config() -> CliConfig {
        CliConfig::new(parse_now("2018-07-15").unwrap())
    }

    fn rules_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_run_prints_sql() {
        let file = rules_file(RULES);
        let output = run(&config().with_rules_file(file.path())).unwrap();

        assert_eq!(
            output,
            "select * from \"songs\" where (\"title\" = ? and exists (select * from \"artists\" \
             where \"songs\".\"artist_id\" = \"artists\".\"id\" and \"name\" <> ?));\n\
             -- bindings: ['Foo', 'Bar']"
        );
    }

    #[test]
    fn test_user_scope() {
        let schema = library_schema();
        let query = compile_rules(&config().with_user(42), &schema, RULES).unwrap();

        assert!(query.predicate.contains("\"user_id\" = ?"));
        assert_eq!(query.bindings.len(), 3);
        assert_eq!(query.bindings[2].as_i64(), Some(42));
    }

    #[test]
    fn test_rule_cap() {
        let schema = library_schema();
        let err = compile_rules(&config().with_max_rules(1), &schema, RULES).unwrap_err();
        assert!(matches!(err, CliError::TooManyRules { count: 2, max: 1 }));
    }

    #[test]
    fn test_unknown_entity() {
        let schema = library_schema();
        let err = compile_rules(&config().with_base_entity("videos"), &schema, RULES).unwrap_err();
        match err {
            CliError::Compile(e) => assert_eq!(e.kind, CompileErrorKind::UnknownEntity),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_json() {
        let schema = library_schema();
        let err = compile_rules(&config(), &schema, "{not json").unwrap_err();
        assert!(matches!(err, CliError::Compile(_)));
    }

    #[test]
    fn test_run_against_database() {
        let db = tempfile::NamedTempFile::new().unwrap();
        {
            let conn = executor::open(db.path()).unwrap();
            executor::create_tables(&conn, &library_schema()).unwrap();
            conn.execute_batch(
                r#"
                INSERT INTO "artists" VALUES (1, 'Baz', NULL, '2018-01-01 00:00:00', '2018-01-01 00:00:00');
                INSERT INTO "songs" ("id", "album_id", "artist_id", "title", "length", "path", "mtime", "created_at", "updated_at")
                    VALUES ('s1', 1, 1, 'Foo', 200.0, '/s1.mp3', 0, '2018-07-12 09:00:00', '2018-07-12 09:00:00');
                "#,
            )
            .unwrap();
        }

        let file = rules_file(RULES);
        let output = run(&config()
            .with_rules_file(file.path())
            .with_database(db.path())
            .with_format(OutputFormat::Json))
        .unwrap();

        let rows: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(rows.as_array().unwrap().len(), 1);
        assert_eq!(rows[0]["title"], "Foo");
    }

    #[test]
    fn test_run_schema() {
        let mut config = config().with_format(OutputFormat::Table);
        config.show_schema = true;
        let output = run(&config).unwrap();
        assert!(output.contains("interactions"));
        assert!(output.contains("many-to-one"));
    }
}
