//! Migration operations and diff text.
//!
//! Operation lists come either from the snapshot planner or straight from a
//! caller as JSON. Either way they render the same way:
//!
//! ```text
//! + posts
//! + posts.title
//! - drafts
//! ~ users.email -> users.emailAddress
//! ```
//!
//! The formatter never reorders; line `i` is operation `i`.

pub mod diff;
pub mod ops;
pub mod plan;

pub use diff::{format_diff, format_raw_diff, DiffSummary};
pub use ops::{decode_operation, decode_operations, ChangeKind, MigrationOp, OPERATION_KINDS};
pub use plan::plan_migration;
