//! Migration operations.
//!
//! The wire shape is one key per operation kind:
//!
//! ```json
//! [
//!   { "addTable": { "table": "posts" } },
//!   { "addColumn": { "table": "posts", "column": { "name": "title", "type": "string" } } },
//!   { "renameColumn": { "table": "users", "oldName": "email", "newName": "emailAddress" } }
//! ]
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{TablegenError, TablegenResult};
use crate::schema::Column;

/// One atomic structural change to a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub enum MigrationOp {
    AddTable {
        table: String,
    },
    RemoveTable {
        table: String,
    },
    RenameTable {
        #[serde(rename = "oldName")]
        old_name: String,
        #[serde(rename = "newName")]
        new_name: String,
    },
    AddColumn {
        table: String,
        column: Column,
    },
    RemoveColumn {
        table: String,
        column: String,
    },
    RenameColumn {
        table: String,
        #[serde(rename = "oldName")]
        old_name: String,
        #[serde(rename = "newName")]
        new_name: String,
    },
}

/// Kind of change, used for the diff marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Added,
    Removed,
    Renamed,
}

impl ChangeKind {
    /// `+`, `-` or `~`.
    pub fn marker(&self) -> char {
        match self {
            Self::Added => '+',
            Self::Removed => '-',
            Self::Renamed => '~',
        }
    }
}

/// Operation tags as they appear on the wire.
pub const OPERATION_KINDS: &[&str] = &[
    "addTable",
    "removeTable",
    "renameTable",
    "addColumn",
    "removeColumn",
    "renameColumn",
];

impl MigrationOp {
    pub fn add_table(table: impl Into<String>) -> Self {
        Self::AddTable { table: table.into() }
    }

    pub fn remove_table(table: impl Into<String>) -> Self {
        Self::RemoveTable { table: table.into() }
    }

    pub fn rename_table(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self::RenameTable {
            old_name: old_name.into(),
            new_name: new_name.into(),
        }
    }

    pub fn add_column(table: impl Into<String>, column: Column) -> Self {
        Self::AddColumn {
            table: table.into(),
            column,
        }
    }

    pub fn remove_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::RemoveColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn rename_column(
        table: impl Into<String>,
        old_name: impl Into<String>,
        new_name: impl Into<String>,
    ) -> Self {
        Self::RenameColumn {
            table: table.into(),
            old_name: old_name.into(),
            new_name: new_name.into(),
        }
    }

    pub fn kind(&self) -> ChangeKind {
        match self {
            Self::AddTable { .. } | Self::AddColumn { .. } => ChangeKind::Added,
            Self::RemoveTable { .. } | Self::RemoveColumn { .. } => ChangeKind::Removed,
            Self::RenameTable { .. } | Self::RenameColumn { .. } => ChangeKind::Renamed,
        }
    }

    pub fn marker(&self) -> char {
        self.kind().marker()
    }

    /// Table the operation applies to (the old name for table renames).
    pub fn table(&self) -> &str {
        match self {
            Self::AddTable { table }
            | Self::RemoveTable { table }
            | Self::AddColumn { table, .. }
            | Self::RemoveColumn { table, .. }
            | Self::RenameColumn { table, .. } => table,
            Self::RenameTable { old_name, .. } => old_name,
        }
    }
}

/// Decode one raw operation. Anything that is not exactly one known
/// operation fails with `UnknownMigrationOperation`.
pub fn decode_operation(raw: &Value) -> TablegenResult<MigrationOp> {
    let Some(obj) = raw.as_object() else {
        return Err(TablegenError::unknown_operation(raw, "operation must be an object"));
    };
    if obj.len() != 1 {
        return Err(TablegenError::unknown_operation(
            raw,
            format!("expected exactly one operation key, found {}", obj.len()),
        ));
    }
    if let Some(key) = obj.keys().next()
        && !OPERATION_KINDS.contains(&key.as_str())
    {
        return Err(TablegenError::unknown_operation(
            raw,
            format!("unknown operation '{}'", key),
        ));
    }
    serde_json::from_value(raw.clone())
        .map_err(|e| TablegenError::unknown_operation(raw, e.to_string()))
}

/// Decode a JSON array of raw operations, preserving order.
pub fn decode_operations(raw: &Value) -> TablegenResult<Vec<MigrationOp>> {
    let Some(items) = raw.as_array() else {
        return Err(TablegenError::unknown_operation(
            raw,
            "operation list must be an array",
        ));
    };
    items.iter().map(decode_operation).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;
    use serde_json::json;

    #[test]
    fn test_decode_all_variants() {
        let raw = json!([
            { "addTable": { "table": "posts" } },
            { "removeTable": { "table": "drafts" } },
            { "renameTable": { "oldName": "people", "newName": "users" } },
            { "addColumn": { "table": "posts", "column": { "name": "author", "type": "link", "link": { "table": "users" } } } },
            { "removeColumn": { "table": "posts", "column": "legacy" } },
            { "renameColumn": { "table": "users", "oldName": "email", "newName": "emailAddress" } }
        ]);
        let ops = decode_operations(&raw).unwrap();
        assert_eq!(
            ops,
            vec![
                MigrationOp::add_table("posts"),
                MigrationOp::remove_table("drafts"),
                MigrationOp::rename_table("people", "users"),
                MigrationOp::add_column("posts", Column::link("author", "users")),
                MigrationOp::remove_column("posts", "legacy"),
                MigrationOp::rename_column("users", "email", "emailAddress"),
            ]
        );
    }

    #[test]
    fn test_serialize_matches_wire_shape() {
        let op = MigrationOp::rename_column("users", "email", "emailAddress");
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({ "renameColumn": { "table": "users", "oldName": "email", "newName": "emailAddress" } })
        );
        let op = MigrationOp::add_column("t", Column::new("c", ColumnType::Unknown("vector".into())));
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({ "addColumn": { "table": "t", "column": { "name": "c", "type": "vector" } } })
        );
    }

    #[test]
    fn test_unknown_kind_carries_raw() {
        let raw = json!({ "alterColumn": { "table": "users", "column": "email" } });
        match decode_operation(&raw) {
            Err(TablegenError::UnknownMigrationOperation { raw: got, reason }) => {
                assert_eq!(got, raw);
                assert!(reason.contains("alterColumn"));
            }
            other => panic!("expected unknown operation, got {other:?}"),
        }
    }

    #[test]
    fn test_ambiguous_and_malformed_are_unknown() {
        let cases = [
            json!({ "addTable": { "table": "a" }, "removeTable": { "table": "b" } }),
            json!({}),
            json!("addTable"),
            json!({ "addTable": { "name": "posts" } }),
            json!({ "renameColumn": { "table": "users", "oldName": "a" } }),
        ];
        for raw in cases {
            assert!(
                matches!(
                    decode_operation(&raw),
                    Err(TablegenError::UnknownMigrationOperation { .. })
                ),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_decode_operations_requires_array() {
        assert!(decode_operations(&json!({ "addTable": { "table": "a" } })).is_err());
        assert!(decode_operations(&json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_markers() {
        assert_eq!(MigrationOp::add_table("a").marker(), '+');
        assert_eq!(MigrationOp::remove_column("a", "b").marker(), '-');
        assert_eq!(MigrationOp::rename_table("a", "b").marker(), '~');
        assert_eq!(MigrationOp::rename_table("a", "b").table(), "a");
    }
}
