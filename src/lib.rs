//! # tablegen
//!
//! Compiles table schemas into typed data-access code and runtime
//! validators, and renders migration operation lists as diff text.
//!
//! ## Quick Example
//!
//! ```rust
//! use tablegen::prelude::*;
//!
//! let schema = Schema::from_json(r#"{
//!     "tables": [
//!         { "name": "users", "columns": [{ "name": "email", "type": "email" }] }
//!     ]
//! }"#).unwrap();
//!
//! let file = tablegen::compile(&schema, "typescript").unwrap();
//! assert_eq!(file.file_name, "schema.ts");
//! assert!(file.content.contains("export interface UsersRecord"));
//!
//! let diff = format_diff(&[MigrationOp::add_table("posts")]);
//! assert_eq!(diff, "+ posts");
//! ```
//!
//! ## Column types
//!
//! | Column type               | Emitted type             | Validator                  |
//! |---------------------------|--------------------------|----------------------------|
//! | `string`, `text`, `email` | `string`                 | `z.string()`               |
//! | `int`, `float`            | `number`                 | `z.number()`               |
//! | `bool`                    | `boolean`                | `z.boolean()`              |
//! | `datetime`                | `string \| Date`         | string or date             |
//! | `multiple`                | `string[]`               | `z.array(z.string())`      |
//! | `link`                    | id or linked record      | string or `{ id }` object  |
//! | anything else             | `unknown`                | `z.unknown()`              |
//!
//! Every field is nullable and optional.

pub mod codegen;
pub mod config;
pub mod error;
pub mod ident;
pub mod index;
pub mod migrate;
pub mod schema;
pub mod types;
pub mod validator;

pub mod prelude {
    pub use crate::codegen::{Compiler, GeneratedFile, Language, Renderer};
    pub use crate::config::TablegenConfig;
    pub use crate::error::*;
    pub use crate::ident::Accessor;
    pub use crate::index::SchemaIndex;
    pub use crate::migrate::{
        decode_operations, format_diff, format_raw_diff, plan_migration, DiffSummary, MigrationOp,
    };
    pub use crate::schema::{Column, ColumnType, LinkTarget, Schema, Table};
    pub use crate::types::{map_type, map_type_name, EmittedType, TypeMapping, ValidatorRule};
    pub use crate::validator::{generate_validators, TableValidator, ToZod};
}

pub use codegen::{compile, Compiler, GeneratedFile, Language};
pub use error::{TablegenError, TablegenResult};
pub use migrate::{format_diff, plan_migration, MigrationOp};
pub use schema::Schema;

/// Load a schema from JSON text.
///
/// # Example
///
/// ```
/// let schema = tablegen::load_schema(r#"{ "tables": [{ "name": "users" }] }"#).unwrap();
/// assert_eq!(schema.tables[0].name, "users");
/// ```
pub fn load_schema(json: &str) -> TablegenResult<Schema> {
    Schema::from_json(json)
}
