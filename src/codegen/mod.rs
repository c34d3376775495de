//! Typed data-access code generation.
//!
//! Each table becomes a record type and a repository class. Two renderings
//! of the same object model are supported: TypeScript (interfaces + typed
//! classes) and JavaScript (ES modules with JSDoc typedefs).
//!
//! Link columns reference the target table's record type by name, so tables
//! that link to each other in a cycle need no particular emission order.

pub mod javascript;
pub mod typescript;

use std::fmt;
use std::str::FromStr;

use crate::error::{TablegenError, TablegenResult};
use crate::index::{SchemaIndex, TableEntry};
use crate::schema::{Column, Schema};
use crate::types::map_type;
use crate::validator::render_validators;

pub use javascript::JavaScript;
pub use typescript::TypeScript;

/// Header placed at the top of every generated file.
pub const GENERATED_HEADER: &str = "// Generated by tablegen. Do not edit.";

/// Output language for generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    TypeScript,
    JavaScript,
}

impl Language {
    /// Accepted language names.
    pub const SUPPORTED: &'static [&'static str] = &["typescript", "javascript"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::JavaScript => "javascript",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::TypeScript => "ts",
            Self::JavaScript => "js",
        }
    }

    /// The renderer for this language.
    pub fn renderer(&self) -> &'static dyn Renderer {
        match self {
            Self::TypeScript => &TypeScript,
            Self::JavaScript => &JavaScript,
        }
    }
}

impl FromStr for Language {
    type Err = TablegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "typescript" | "ts" => Ok(Self::TypeScript),
            "javascript" | "js" => Ok(Self::JavaScript),
            _ => Err(TablegenError::UnsupportedLanguage {
                requested: s.to_string(),
                supported: Self::SUPPORTED.to_vec(),
            }),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A language-specific rendering of the generated object model.
pub trait Renderer {
    /// Shared declarations used by every repository (the client contract).
    fn prelude(&self) -> String;

    /// Record type declaration for one table.
    fn record(&self, entry: &TableEntry<'_>, index: &SchemaIndex<'_>) -> String;

    /// Repository class for one table.
    fn repository(&self, entry: &TableEntry<'_>) -> String;

    /// Factory building every repository from a client.
    fn registry(&self, index: &SchemaIndex<'_>) -> String;
}

/// Field type of `column` as seen from generated declarations.
pub(crate) fn field_type(column: &Column, index: &SchemaIndex<'_>) -> String {
    let mapping = map_type(&column.column_type);
    let target = index.link_record_type(column);
    mapping.emitted.render(target.as_deref())
}

/// A single generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Suggested file name, e.g. `schema.ts`.
    pub file_name: String,
    pub content: String,
}

/// Compiles a schema into one source file.
#[derive(Debug, Clone, Copy)]
pub struct Compiler {
    language: Language,
    validators: bool,
    header: bool,
}

impl Compiler {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            validators: true,
            header: true,
        }
    }

    /// Include the zod validator block (default: on).
    pub fn with_validators(mut self, validators: bool) -> Self {
        self.validators = validators;
        self
    }

    /// Include the "do not edit" header (default: on).
    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Compile `schema`. Fails on duplicate definitions; unresolved links and
    /// unknown column types degrade instead of failing.
    pub fn compile(&self, schema: &Schema) -> TablegenResult<GeneratedFile> {
        let index = SchemaIndex::build(schema)?;
        let renderer = self.language.renderer();

        let mut sections: Vec<String> = Vec::new();

        let mut top = Vec::new();
        if self.header {
            top.push(GENERATED_HEADER.to_string());
        }
        if self.validators {
            top.push("import { z } from \"zod\";".to_string());
        }
        if !top.is_empty() {
            sections.push(top.join("\n"));
        }

        sections.push(renderer.prelude());
        for entry in index.entries() {
            sections.push(renderer.record(&entry, &index));
            sections.push(renderer.repository(&entry));
        }
        sections.push(renderer.registry(&index));

        if self.validators {
            let block = render_validators(&index, self.language);
            if !block.is_empty() {
                sections.push(block);
            }
        }

        let mut content = sections
            .iter()
            .map(|s| s.trim_end())
            .collect::<Vec<_>>()
            .join("\n\n");
        content.push('\n');

        tracing::info!(
            language = %self.language,
            tables = schema.tables.len(),
            bytes = content.len(),
            "schema compiled"
        );

        Ok(GeneratedFile {
            file_name: format!("schema.{}", self.language.extension()),
            content,
        })
    }
}

/// Compile `schema` for a language given by name.
pub fn compile(schema: &Schema, language: &str) -> TablegenResult<GeneratedFile> {
    let language: Language = language.parse()?;
    Compiler::new(language).compile(schema)
}
