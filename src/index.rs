//! Two-pass name resolution over a schema.
//!
//! Pass 1 registers every table under its name and assigns it a unique
//! generated type name. Pass 2 resolves `link` columns by looking the target
//! up in that table. Links refer to tables by name only, so declaration order
//! and cycles between tables never matter.

use std::collections::{HashMap, HashSet};

use crate::error::{TablegenError, TablegenResult};
use crate::ident;
use crate::schema::{Column, Schema, Table};

/// A link column whose target is not a table of the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedLink {
    pub table: String,
    pub column: String,
    /// `None` when the column declares no target at all.
    pub target: Option<String>,
}

/// A table together with its generated names.
#[derive(Debug, Clone, Copy)]
pub struct TableEntry<'a> {
    pub table: &'a Table,
    pub type_name: &'a str,
}

impl TableEntry<'_> {
    /// Record interface / typedef name, e.g. `UsersRecord`.
    pub fn record_type(&self) -> String {
        format!("{}Record", self.type_name)
    }

    /// Repository class name, e.g. `UsersRepository`.
    pub fn repository_type(&self) -> String {
        format!("{}Repository", self.type_name)
    }

    /// Validator constant name, e.g. `UsersSchema`.
    pub fn validator_name(&self) -> String {
        format!("{}Schema", self.type_name)
    }
}

/// Name-keyed view of a schema used by every generator.
#[derive(Debug)]
pub struct SchemaIndex<'a> {
    schema: &'a Schema,
    type_names: Vec<String>,
    by_name: HashMap<&'a str, usize>,
    unresolved: Vec<UnresolvedLink>,
}

impl<'a> SchemaIndex<'a> {
    /// Build the index, rejecting duplicate table names and duplicate column
    /// names within a table.
    pub fn build(schema: &'a Schema) -> TablegenResult<Self> {
        let mut by_name = HashMap::with_capacity(schema.tables.len());
        let mut used = HashSet::with_capacity(schema.tables.len());
        let mut type_names = Vec::with_capacity(schema.tables.len());

        for (i, table) in schema.tables.iter().enumerate() {
            if by_name.insert(table.name.as_str(), i).is_some() {
                return Err(TablegenError::duplicate_table(&table.name));
            }

            let mut columns = HashSet::with_capacity(table.columns.len());
            for col in &table.columns {
                if !columns.insert(col.name.as_str()) {
                    return Err(TablegenError::duplicate_column(&table.name, &col.name));
                }
            }

            let base = ident::type_name(&table.name);
            let mut candidate = base.clone();
            let mut n = 2;
            while used.contains(&candidate) {
                candidate = format!("{}{}", base, n);
                n += 1;
            }
            used.insert(candidate.clone());
            type_names.push(candidate);
        }

        let mut unresolved = Vec::new();
        for table in &schema.tables {
            for col in &table.columns {
                if col.column_type != crate::schema::ColumnType::Link {
                    continue;
                }
                let target = col.link_target();
                if target.is_none_or(|t| !by_name.contains_key(t)) {
                    tracing::warn!(
                        table = %table.name,
                        column = %col.name,
                        target = target.unwrap_or("<none>"),
                        "unresolved link target, emitting opaque link type"
                    );
                    unresolved.push(UnresolvedLink {
                        table: table.name.clone(),
                        column: col.name.clone(),
                        target: target.map(str::to_string),
                    });
                }
            }
        }

        tracing::debug!(
            tables = schema.tables.len(),
            unresolved = unresolved.len(),
            "schema index built"
        );

        Ok(Self {
            schema,
            type_names,
            by_name,
            unresolved,
        })
    }

    /// Tables in declaration order with their generated names.
    pub fn entries(&self) -> impl Iterator<Item = TableEntry<'_>> {
        self.schema
            .tables
            .iter()
            .zip(&self.type_names)
            .map(|(table, type_name)| TableEntry {
                table,
                type_name: type_name.as_str(),
            })
    }

    /// Look up a table entry by table name.
    pub fn entry(&self, table: &str) -> Option<TableEntry<'_>> {
        let i = *self.by_name.get(table)?;
        Some(TableEntry {
            table: &self.schema.tables[i],
            type_name: &self.type_names[i],
        })
    }

    /// Record type of the table a link column points at, when it resolves.
    pub fn link_record_type(&self, column: &Column) -> Option<String> {
        column
            .link_target()
            .and_then(|target| self.entry(target))
            .map(|entry| entry.record_type())
    }

    pub fn unresolved_links(&self) -> &[UnresolvedLink] {
        &self.unresolved
    }
}
