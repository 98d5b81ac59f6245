//! CLI error types.

use smartlist_lang::CompileError;
use thiserror::Error;

/// Errors surfaced by the command-line front end.
#[derive(Debug, Error)]
pub enum CliError {
    /// The `--now` argument is not a date or date-time.
    #[error("invalid reference time '{0}': expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS")]
    InvalidNow(String),

    /// The rule tree exceeds the configured size cap.
    #[error("rule tree has {count} rules, more than the limit of {max}")]
    TooManyRules { count: usize, max: usize },

    /// Rule validation or compilation failed.
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),

    /// Reading the rule file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Executing against the catalog database failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}
