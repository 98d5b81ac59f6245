//! CLI configuration.

use crate::error::CliError;
use crate::formatter::OutputFormat;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::Parser;
use smartlist_core::catalog::SONGS;
use std::path::PathBuf;

/// Default cap on the number of rules in one tree.
pub const DEFAULT_MAX_RULES: usize = 100;

/// Rule source meaning standard input.
pub const STDIN_SOURCE: &str = "-";

/// Compile smart playlist rules into a parameterized query.
#[derive(Debug, Parser)]
#[command(name = "smartlist")]
#[command(version, about = "Compile smart playlist rules into a parameterized query")]
pub struct Args {
    /// Rule tree JSON file, or '-' for standard input
    #[arg(short, long, default_value = STDIN_SOURCE)]
    pub rules: String,

    /// Scope per-user fields to this user id
    #[arg(short, long, env = "SMARTLIST_USER")]
    pub user: Option<i64>,

    /// Reference time for relative-date rules (defaults to now)
    #[arg(long)]
    pub now: Option<String>,

    /// Base entity the playlist selects from
    #[arg(short, long, default_value = SONGS, env = "SMARTLIST_ENTITY")]
    pub entity: String,

    /// Output format
    #[arg(short, long, default_value = "sql", value_enum)]
    pub format: OutputFormat,

    /// SQLite catalog to run the compiled query against
    #[arg(short, long, env = "SMARTLIST_DATABASE")]
    pub database: Option<PathBuf>,

    /// Maximum number of rules accepted in one tree
    #[arg(long, default_value_t = DEFAULT_MAX_RULES)]
    pub max_rules: usize,

    /// Print the catalog schema and exit
    #[arg(long)]
    pub schema: bool,
}

/// Where the rule tree is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulesSource {
    /// Standard input.
    Stdin,
    /// A JSON file.
    File(PathBuf),
}

/// Resolved CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Where the rule tree comes from.
    pub rules: RulesSource,
    /// User to scope per-user fields to.
    pub user_id: Option<i64>,
    /// Reference time for relative-date rules.
    pub now: NaiveDateTime,
    /// Base entity.
    pub base_entity: String,
    /// Output format.
    pub format: OutputFormat,
    /// Catalog database, when the query should be executed.
    pub database: Option<PathBuf>,
    /// Cap on the number of rules.
    pub max_rules: usize,
    /// Print the schema instead of compiling.
    pub show_schema: bool,
}

impl CliConfig {
    /// Create a configuration with defaults, reading rules from standard input.
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            rules: RulesSource::Stdin,
            user_id: None,
            now,
            base_entity: SONGS.to_string(),
            format: OutputFormat::Sql,
            database: None,
            max_rules: DEFAULT_MAX_RULES,
            show_schema: false,
        }
    }

    /// Read rules from a file.
    pub fn with_rules_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.rules = RulesSource::File(path.into());
        self
    }

    /// Scope per-user fields to a user.
    pub fn with_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Set the base entity.
    pub fn with_base_entity(mut self, entity: impl Into<String>) -> Self {
        self.base_entity = entity.into();
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Execute against a catalog database.
    pub fn with_database(mut self, path: impl Into<PathBuf>) -> Self {
        self.database = Some(path.into());
        self
    }

    /// Set the rule cap.
    pub fn with_max_rules(mut self, max: usize) -> Self {
        self.max_rules = max;
        self
    }
}

impl TryFrom<&Args> for CliConfig {
    type Error = CliError;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        let now = match &args.now {
            Some(text) => parse_now(text)?,
            None => chrono::Local::now().naive_local(),
        };

        let mut config = CliConfig::new(now)
            .with_base_entity(&args.entity)
            .with_format(args.format)
            .with_max_rules(args.max_rules);
        config.show_schema = args.schema;

        if args.rules != STDIN_SOURCE {
            config = config.with_rules_file(&args.rules);
        }
        if let Some(user) = args.user {
            config = config.with_user(user);
        }
        if let Some(path) = &args.database {
            config = config.with_database(path);
        }
        Ok(config)
    }
}

/// Parse a reference time given as a date or a date-time.
pub fn parse_now(text: &str) -> Result<NaiveDateTime, CliError> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::default()))
        })
        .map_err(|_| CliError::InvalidNow(text.to_string()))
}
