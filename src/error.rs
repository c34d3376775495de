//! Error types for tablegen.

use thiserror::Error;

/// The main error type for schema compilation and diffing.
#[derive(Debug, Error)]
pub enum TablegenError {
    /// The schema input is not structurally well-formed.
    #[error("{}", parse_message(.message, .line, .column, .fragment))]
    SchemaParse {
        message: String,
        /// 1-based; `None` when the input had no text form.
        line: Option<usize>,
        column: Option<usize>,
        fragment: String,
    },

    /// A table (or a column within a table) is defined more than once.
    #[error("{}", duplicate_message(.table, .column.as_deref()))]
    DuplicateDefinition {
        table: String,
        column: Option<String>,
    },

    /// The requested output language is not one of the supported renderings.
    #[error("Unsupported language: '{requested}'. Expected one of: {}", .supported.join(", "))]
    UnsupportedLanguage {
        requested: String,
        supported: Vec<&'static str>,
    },

    /// A migration operation matched none of the known variants.
    #[error("Unknown migration operation ({reason}): {raw}")]
    UnknownMigrationOperation {
        raw: serde_json::Value,
        reason: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn parse_message(
    message: &str,
    line: &Option<usize>,
    column: &Option<usize>,
    fragment: &str,
) -> String {
    match (line, column) {
        (Some(line), Some(column)) => format!(
            "Schema parse error at line {line}, column {column}: {message}\n  --> {fragment}"
        ),
        _ => format!("Schema parse error: {message}\n  --> {fragment}"),
    }
}

fn duplicate_message(table: &str, column: Option<&str>) -> String {
    match column {
        Some(column) => format!("Duplicate definition: column '{column}' in table '{table}'"),
        None => format!("Duplicate definition: table '{table}'"),
    }
}

impl TablegenError {
    /// Build a parse error pointing at `line`/`column` (1-based) of `input`.
    pub fn schema_parse(input: &str, line: usize, column: usize, message: impl Into<String>) -> Self {
        let fragment = input
            .lines()
            .nth(line.saturating_sub(1))
            .map(|l| l.trim().to_string())
            .unwrap_or_default();
        Self::SchemaParse {
            message: message.into(),
            line: Some(line),
            column: Some(column),
            fragment,
        }
    }

    /// Create a duplicate table error.
    pub fn duplicate_table(table: impl Into<String>) -> Self {
        Self::DuplicateDefinition {
            table: table.into(),
            column: None,
        }
    }

    /// Create a duplicate column error.
    pub fn duplicate_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::DuplicateDefinition {
            table: table.into(),
            column: Some(column.into()),
        }
    }

    /// Create an unknown operation error holding the raw value.
    pub fn unknown_operation(raw: &serde_json::Value, reason: impl Into<String>) -> Self {
        Self::UnknownMigrationOperation {
            raw: raw.clone(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for tablegen operations.
pub type TablegenResult<T> = Result<T, TablegenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_carries_fragment() {
        let input = "{\n  \"tables\": [\n    { \"nme\": \"users\" }\n  ]\n}";
        let err = TablegenError::schema_parse(input, 3, 5, "missing field `name`");
        assert_eq!(
            err.to_string(),
            "Schema parse error at line 3, column 5: missing field `name`\n  --> { \"nme\": \"users\" }"
        );
    }

    #[test]
    fn test_parse_error_without_position() {
        let err = TablegenError::SchemaParse {
            message: "missing field `name`".into(),
            line: None,
            column: None,
            fragment: "{\"tables\":[{}]}".into(),
        };
        assert_eq!(
            err.to_string(),
            "Schema parse error: missing field `name`\n  --> {\"tables\":[{}]}"
        );
    }

    #[test]
    fn test_duplicate_display() {
        assert_eq!(
            TablegenError::duplicate_table("users").to_string(),
            "Duplicate definition: table 'users'"
        );
        assert_eq!(
            TablegenError::duplicate_column("users", "email").to_string(),
            "Duplicate definition: column 'email' in table 'users'"
        );
    }

    #[test]
    fn test_unsupported_language_lists_values() {
        let err = TablegenError::UnsupportedLanguage {
            requested: "python".into(),
            supported: vec!["typescript", "javascript"],
        };
        assert_eq!(
            err.to_string(),
            "Unsupported language: 'python'. Expected one of: typescript, javascript"
        );
    }
}
