//! Snapshot planner: the operation list that turns one schema into another.

use super::ops::MigrationOp;
use crate::error::TablegenResult;
use crate::index::SchemaIndex;
use crate::schema::{Column, Schema};

/// Compute the operations migrating `old` to `new`.
///
/// Order: new tables (with their columns), then removed tables, then
/// column changes on tables present in both. Renames are never inferred;
/// a renamed table shows up as a removal plus an addition.
///
/// Both snapshots must be free of duplicate tables and columns.
pub fn plan_migration(old: &Schema, new: &Schema) -> TablegenResult<Vec<MigrationOp>> {
    SchemaIndex::build(old)?;
    SchemaIndex::build(new)?;

    let mut ops = Vec::new();

    for table in &new.tables {
        if old.find_table(&table.name).is_none() {
            ops.push(MigrationOp::add_table(&table.name));
            for col in &table.columns {
                ops.push(MigrationOp::add_column(&table.name, col.clone()));
            }
        }
    }

    for table in &old.tables {
        if new.find_table(&table.name).is_none() {
            ops.push(MigrationOp::remove_table(&table.name));
        }
    }

    for new_table in &new.tables {
        let Some(old_table) = old.find_table(&new_table.name) else {
            continue;
        };

        for col in &old_table.columns {
            let keep = new_table
                .find_column(&col.name)
                .is_some_and(|c| same_shape(col, c));
            if !keep {
                ops.push(MigrationOp::remove_column(&new_table.name, &col.name));
            }
        }

        for col in &new_table.columns {
            let existing = old_table
                .find_column(&col.name)
                .is_some_and(|c| same_shape(c, col));
            if !existing {
                ops.push(MigrationOp::add_column(&new_table.name, col.clone()));
            }
        }
    }

    tracing::debug!(
        old_tables = old.tables.len(),
        new_tables = new.tables.len(),
        operations = ops.len(),
        "migration planned"
    );
    Ok(ops)
}

fn same_shape(a: &Column, b: &Column) -> bool {
    a.column_type == b.column_type && a.link_target() == b.link_target()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TablegenError;
    use crate::migrate::format_diff;
    use crate::schema::Table;
    use pretty_assertions::assert_eq;

    fn base() -> Schema {
        Schema::new()
            .table(Table::new("users").column("email", "email").column("age", "int"))
            .table(Table::new("drafts").column("body", "text"))
    }

    #[test]
    fn test_identical_is_empty() {
        let s = base();
        assert!(plan_migration(&s, &s).unwrap().is_empty());
        assert_eq!(format_diff(&plan_migration(&s, &s).unwrap()), "");
    }

    #[test]
    fn test_plan_order() {
        let new = Schema::new()
            .table(
                Table::new("users")
                    .column("email", "email")
                    .column("age", "float")
                    .column("name", "string"),
            )
            .table(Table::new("posts").column("title", "text").link("author", "users"));

        assert_eq!(
            format_diff(&plan_migration(&base(), &new).unwrap()),
            "+ posts\n\
             + posts.title\n\
             + posts.author\n\
             - drafts\n\
             - users.age\n\
             + users.age\n\
             + users.name"
        );
    }

    #[test]
    fn test_link_target_change() {
        let old = Schema::new().table(Table::new("posts").link("author", "users"));
        let new = Schema::new().table(Table::new("posts").link("author", "people"));
        let ops = plan_migration(&old, &new).unwrap();
        assert_eq!(
            ops,
            vec![
                MigrationOp::remove_column("posts", "author"),
                MigrationOp::add_column("posts", Column::link("author", "people")),
            ]
        );
    }

    #[test]
    fn test_table_rename_not_inferred() {
        let old = Schema::new().table(Table::new("people"));
        let new = Schema::new().table(Table::new("users"));
        assert_eq!(format_diff(&plan_migration(&old, &new).unwrap()), "+ users\n- people");
    }

    #[test]
    fn test_duplicate_table_in_either_snapshot() {
        let clean = Schema::new().table(Table::new("users").column("email", "email"));
        let doubled = Schema::new()
            .table(Table::new("users").column("email", "email"))
            .table(Table::new("users").column("name", "string"));

        for (old, new) in [(&clean, &doubled), (&doubled, &clean)] {
            match plan_migration(old, new) {
                Err(TablegenError::DuplicateDefinition { table, column: None }) => {
                    assert_eq!(table, "users");
                }
                other => panic!("expected duplicate table, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let old = Schema::new().table(Table::new("t").column("a", "int").column("a", "bool"));
        let new = Schema::new().table(Table::new("t").column("a", "bool"));
        assert!(matches!(
            plan_migration(&old, &new),
            Err(TablegenError::DuplicateDefinition { column: Some(_), .. })
        ));
    }
}
