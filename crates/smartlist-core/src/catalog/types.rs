//! Core type definitions for the catalog.

use std::fmt;

/// Scalar column types in the media catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    /// Boolean value.
    Bool,
    /// Signed integer.
    Int,
    /// Floating point.
    Float,
    /// UTF-8 string.
    String,
    /// Timestamp without zone.
    Timestamp,
}

impl ScalarType {
    /// SQL type name used when creating a backing table.
    pub fn sql_type(&self) -> &'static str {
        match self {
            ScalarType::Bool => "BOOLEAN",
            ScalarType::Int => "INTEGER",
            ScalarType::Float => "REAL",
            ScalarType::String => "TEXT",
            ScalarType::Timestamp => "TIMESTAMP",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarType::Bool => write!(f, "bool"),
            ScalarType::Int => write!(f, "int"),
            ScalarType::Float => write!(f, "float"),
            ScalarType::String => write!(f, "string"),
            ScalarType::Timestamp => write!(f, "timestamp"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_sql_type() {
        assert_eq!(ScalarType::Timestamp.to_string(), "timestamp");
        assert_eq!(ScalarType::Float.sql_type(), "REAL");
        assert_eq!(ScalarType::Bool.sql_type(), "BOOLEAN");
    }
}
