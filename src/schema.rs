//! Schema definitions and the JSON schema loader.
//!
//! A schema is an ordered list of tables, each an ordered list of columns.
//! Order of appearance in the input is preserved everywhere so that generated
//! code and diffs are byte-stable across runs.
//!
//! # Example
//! ```
//! use tablegen::schema::{ColumnType, Schema};
//!
//! let json = r#"{
//!     "tables": [{
//!         "name": "posts",
//!         "columns": [
//!             { "name": "title", "type": "string" },
//!             { "name": "author", "type": "link", "link": { "table": "users" } }
//!         ]
//!     }]
//! }"#;
//!
//! let schema = Schema::from_json(json).unwrap();
//! assert_eq!(schema.tables[0].columns[1].column_type, ColumnType::Link);
//! assert_eq!(schema.tables[0].columns[1].link_target(), Some("users"));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{TablegenError, TablegenResult};

/// Database schema definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub tables: Vec<Table>,
}

/// Table definition with columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
}

/// Column definition with type information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Target of a `link` column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkTarget>,
}

/// The table a `link` column points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTarget {
    pub table: String,
}

/// Column type vocabulary.
///
/// Anything outside the known set is kept verbatim in `Unknown` so newer
/// server-side types never fail to load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnType {
    String,
    Text,
    Email,
    Int,
    Float,
    Bool,
    Datetime,
    Multiple,
    Link,
    Unknown(String),
}

impl ColumnType {
    /// Parse a type name. Never fails.
    pub fn parse(s: &str) -> Self {
        match s {
            "string" => Self::String,
            "text" => Self::Text,
            "email" => Self::Email,
            "int" => Self::Int,
            "float" => Self::Float,
            "bool" => Self::Bool,
            "datetime" => Self::Datetime,
            "multiple" => Self::Multiple,
            "link" => Self::Link,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The literal type name as written in the schema.
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::Email => "email",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Datetime => "datetime",
            Self::Multiple => "multiple",
            Self::Link => "link",
            Self::Unknown(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<String> for ColumnType {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<&str> for ColumnType {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<ColumnType> for String {
    fn from(t: ColumnType) -> Self {
        match t {
            ColumnType::Unknown(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Load a schema from JSON text.
    ///
    /// Only the structural shape is checked here; duplicate names and link
    /// targets are examined by [`crate::index::SchemaIndex`].
    pub fn from_json(json: &str) -> TablegenResult<Self> {
        let schema: Schema = serde_json::from_str(json).map_err(|e| {
            TablegenError::schema_parse(json, e.line(), e.column(), strip_position(&e))
        })?;
        tracing::debug!(tables = schema.tables.len(), "schema loaded");
        Ok(schema)
    }

    /// Load a schema from an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> TablegenResult<Self> {
        let fragment = value.to_string();
        serde_json::from_value(value).map_err(|e| TablegenError::SchemaParse {
            message: strip_position(&e),
            line: None,
            column: None,
            fragment,
        })
    }

    /// Add a table to the schema.
    pub fn add_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// Builder: append a table.
    pub fn table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// Find a table by name (first match).
    pub fn find_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    /// Create a new table definition.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
        }
    }

    /// Add a column to the table.
    pub fn add_column(&mut self, col: Column) {
        self.columns.push(col);
    }

    /// Builder: add a simple column.
    pub fn column(mut self, name: &str, typ: &str) -> Self {
        self.columns.push(Column::new(name, ColumnType::parse(typ)));
        self
    }

    /// Builder: add a link column pointing at `target`.
    pub fn link(mut self, name: &str, target: &str) -> Self {
        self.columns.push(Column::link(name, target));
        self
    }

    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

impl Column {
    pub fn new(name: &str, column_type: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            column_type,
            link: None,
        }
    }

    pub fn link(name: &str, target: &str) -> Self {
        Self {
            name: name.to_string(),
            column_type: ColumnType::Link,
            link: Some(LinkTarget {
                table: target.to_string(),
            }),
        }
    }

    /// Name of the linked table, only for `link` columns.
    pub fn link_target(&self) -> Option<&str> {
        match self.column_type {
            ColumnType::Link => self.link.as_ref().map(|l| l.table.as_str()),
            _ => None,
        }
    }
}

/// serde_json appends " at line X column Y"; the position is reported separately.
fn strip_position(e: &serde_json::Error) -> String {
    let msg = e.to_string();
    match msg.rfind(" at line ") {
        Some(idx) => msg[..idx].to_string(),
        None => msg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_from_json_keeps_order() {
        let json = r#"{
            "tables": [
                { "name": "zebras", "columns": [{ "name": "b", "type": "int" }, { "name": "a", "type": "bool" }] },
                { "name": "apples", "columns": [] }
            ]
        }"#;

        let schema = Schema::from_json(json).unwrap();
        let names: Vec<&str> = schema.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["zebras", "apples"]);
        let cols: Vec<&str> = schema.tables[0].columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(cols, vec!["b", "a"]);
    }

    #[test]
    fn test_unknown_type_is_kept() {
        let json = r#"{ "tables": [{ "name": "docs", "columns": [{ "name": "embedding", "type": "vector" }] }] }"#;
        let schema = Schema::from_json(json).unwrap();
        assert_eq!(
            schema.tables[0].columns[0].column_type,
            ColumnType::Unknown("vector".into())
        );
    }

    #[test]
    fn test_columns_default_to_empty() {
        let schema = Schema::from_json(r#"{ "tables": [{ "name": "empty" }] }"#).unwrap();
        assert!(schema.tables[0].columns.is_empty());
    }

    #[test]
    fn test_missing_name_is_parse_error() {
        let json = "{\n  \"tables\": [\n    { \"columns\": [] }\n  ]\n}";
        match Schema::from_json(json) {
            Err(TablegenError::SchemaParse { message, line, fragment, .. }) => {
                assert!(message.contains("missing field `name`"));
                assert_eq!(line, Some(3));
                assert_eq!(fragment, "{ \"columns\": [] }");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_shape_is_parse_error() {
        assert!(matches!(
            Schema::from_json(r#"{ "tables": { "name": "users" } }"#),
            Err(TablegenError::SchemaParse { .. })
        ));
        assert!(matches!(
            Schema::from_json("not json"),
            Err(TablegenError::SchemaParse { .. })
        ));
    }

    #[test]
    fn test_from_value() {
        let schema = Schema::from_value(json!({
            "tables": [{ "name": "users", "columns": [{ "name": "email", "type": "email" }] }]
        }))
        .unwrap();
        assert_eq!(schema.tables[0].columns[0].column_type, ColumnType::Email);

        let err = Schema::from_value(json!({ "tables": [{ "columns": [] }] })).unwrap_err();
        assert!(matches!(
            err,
            TablegenError::SchemaParse { line: None, column: None, .. }
        ));
        assert!(!err.to_string().contains("line"));
    }

    #[test]
    fn test_link_target_only_for_links() {
        let mut col = Column::link("author", "users");
        assert_eq!(col.link_target(), Some("users"));
        col.column_type = ColumnType::String;
        assert_eq!(col.link_target(), None);
        assert_eq!(Column::new("owner", ColumnType::Link).link_target(), None);
    }

    #[test]
    fn test_column_type_serializes_verbatim() {
        let table = Table::new("t").column("a", "datetime").column("b", "geo");
        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(
            value,
            json!({ "name": "t", "columns": [
                { "name": "a", "type": "datetime" },
                { "name": "b", "type": "geo" }
            ]})
        );
    }
}
