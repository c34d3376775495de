//! Runtime validators mirroring the table model.
//!
//! Every table becomes a record validator keyed by literal column names. Each
//! field is nullable and optional: absence and `null` always pass, matching
//! the laxness of decoded server responses.

use serde_json::Value;

use crate::codegen::Language;
use crate::error::TablegenResult;
use crate::ident;
use crate::index::{SchemaIndex, TableEntry};
use crate::schema::Schema;
use crate::types::{map_type, ValidatorRule};

/// Trait for rendering validator nodes as zod expressions.
pub trait ToZod {
    fn to_zod(&self) -> String;
}

impl ToZod for ValidatorRule {
    fn to_zod(&self) -> String {
        match self {
            Self::String => "z.string()".to_string(),
            Self::Number => "z.number()".to_string(),
            Self::Boolean => "z.boolean()".to_string(),
            Self::Date => "z.date()".to_string(),
            Self::Unknown => "z.unknown()".to_string(),
            Self::Array(inner) => format!("z.array({})", inner.to_zod()),
            Self::Union(rules) => {
                let parts: Vec<String> = rules.iter().map(|r| r.to_zod()).collect();
                format!("z.union([{}])", parts.join(", "))
            }
            Self::Object(fields) => {
                let parts: Vec<String> = fields
                    .iter()
                    .map(|(name, rule)| format!("{}: {}", ident::resolve(name).property(), rule.to_zod()))
                    .collect();
                format!("z.object({{ {} }}).passthrough()", parts.join(", "))
            }
        }
    }
}

/// One field of a table validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValidator {
    /// Literal column name.
    pub name: String,
    pub rule: ValidatorRule,
}

impl ToZod for FieldValidator {
    fn to_zod(&self) -> String {
        format!("{}.nullable().optional()", self.rule.to_zod())
    }
}

/// A field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Offending field; `None` when the record itself is not an object.
    pub field: Option<String>,
    pub expected: String,
}

/// Record validator for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableValidator {
    pub table: String,
    /// Name of the emitted constant, e.g. `UsersSchema`.
    pub name: String,
    /// Name of the inferred TypeScript type, e.g. `UsersInput`.
    pub input_type: String,
    pub fields: Vec<FieldValidator>,
}

impl TableValidator {
    fn from_entry(entry: &TableEntry<'_>) -> Self {
        Self {
            table: entry.table.name.clone(),
            name: entry.validator_name(),
            input_type: format!("{}Input", entry.type_name),
            fields: entry
                .table
                .columns
                .iter()
                .map(|col| FieldValidator {
                    name: col.name.clone(),
                    rule: map_type(&col.column_type).rule,
                })
                .collect(),
        }
    }

    /// Check a decoded record. Unknown keys are ignored; missing and null
    /// fields always pass.
    pub fn check(&self, record: &Value) -> Vec<Violation> {
        let Some(obj) = record.as_object() else {
            return vec![Violation {
                field: None,
                expected: "object".to_string(),
            }];
        };

        self.fields
            .iter()
            .filter_map(|field| match obj.get(&field.name) {
                None | Some(Value::Null) => None,
                Some(value) if accepts(&field.rule, value) => None,
                Some(_) => Some(Violation {
                    field: Some(field.name.clone()),
                    expected: field.rule.describe(),
                }),
            })
            .collect()
    }

    pub fn is_valid(&self, record: &Value) -> bool {
        self.check(record).is_empty()
    }
}

impl ToZod for TableValidator {
    fn to_zod(&self) -> String {
        if self.fields.is_empty() {
            return "z.object({}).passthrough()".to_string();
        }
        let mut out = String::from("z.object({\n");
        for field in &self.fields {
            out.push_str(&format!(
                "  {}: {},\n",
                ident::resolve(&field.name).property(),
                field.to_zod()
            ));
        }
        out.push_str("}).passthrough()");
        out
    }
}

/// JSON values have no date type; serialised dates arrive as strings.
fn accepts(rule: &ValidatorRule, value: &Value) -> bool {
    match rule {
        ValidatorRule::String | ValidatorRule::Date => value.is_string(),
        ValidatorRule::Number => value.is_number(),
        ValidatorRule::Boolean => value.is_boolean(),
        ValidatorRule::Unknown => true,
        ValidatorRule::Array(inner) => value
            .as_array()
            .is_some_and(|items| items.iter().all(|item| accepts(inner, item))),
        ValidatorRule::Union(rules) => rules.iter().any(|r| accepts(r, value)),
        ValidatorRule::Object(fields) => value.as_object().is_some_and(|obj| {
            fields
                .iter()
                .all(|(name, rule)| obj.get(name).is_some_and(|v| accepts(rule, v)))
        }),
    }
}

/// Build one validator per table, in table order.
pub fn build_validators(index: &SchemaIndex<'_>) -> Vec<TableValidator> {
    index.entries().map(|e| TableValidator::from_entry(&e)).collect()
}

/// Render the validator block for `language`, without the zod import.
pub fn render_validators(index: &SchemaIndex<'_>, language: Language) -> String {
    let mut out = String::new();
    for (i, validator) in build_validators(index).iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!(
            "export const {} = {};\n",
            validator.name,
            validator.to_zod()
        ));
        if language == Language::TypeScript {
            out.push_str(&format!(
                "export type {} = z.infer<typeof {}>;\n",
                validator.input_type, validator.name
            ));
        }
    }
    out
}

/// Generate a standalone validator module for `schema`.
pub fn generate_validators(schema: &Schema, language: Language) -> TablegenResult<String> {
    let index = SchemaIndex::build(schema)?;
    let mut out = String::from("import { z } from \"zod\";\n\n");
    out.push_str(&render_validators(&index, language));
    Ok(out)
}
