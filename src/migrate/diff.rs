//! Diff text rendering.

use std::fmt;

use serde_json::Value;

use super::ops::{decode_operations, ChangeKind, MigrationOp};
use crate::error::TablegenResult;

impl fmt::Display for MigrationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.marker();
        match self {
            Self::AddTable { table } | Self::RemoveTable { table } => write!(f, "{} {}", m, table),
            Self::RenameTable { old_name, new_name } => {
                write!(f, "{} {} -> {}", m, old_name, new_name)
            }
            Self::AddColumn { table, column } => write!(f, "{} {}.{}", m, table, column.name),
            Self::RemoveColumn { table, column } => write!(f, "{} {}.{}", m, table, column),
            Self::RenameColumn {
                table,
                old_name,
                new_name,
            } => write!(f, "{} {}.{} -> {}.{}", m, table, old_name, table, new_name),
        }
    }
}

/// One line per operation, in input order, joined with `\n`.
pub fn format_diff(ops: &[MigrationOp]) -> String {
    ops.iter()
        .map(|op| op.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Decode a raw JSON operation list and format it. Fails on the first
/// operation that matches no known kind; nothing is skipped.
pub fn format_raw_diff(raw: &Value) -> TablegenResult<String> {
    let ops = decode_operations(raw)?;
    tracing::debug!(operations = ops.len(), "formatting raw migration");
    Ok(format_diff(&ops))
}

/// Per-kind operation counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub additions: usize,
    pub removals: usize,
    pub renames: usize,
}

impl DiffSummary {
    pub fn from_ops(ops: &[MigrationOp]) -> Self {
        let mut summary = Self::default();
        for op in ops {
            match op.kind() {
                ChangeKind::Added => summary.additions += 1,
                ChangeKind::Removed => summary.removals += 1,
                ChangeKind::Renamed => summary.renames += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.additions + self.removals + self.renames
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} added, {} removed, {} renamed",
            self.additions, self.removals, self.renames
        )
    }
}
