//! Column type mapping.
//!
//! `map_type` is the single place where a schema column type becomes a target
//! language type and a validator rule. It is total: unrecognised types map to
//! the permissive `unknown` pair instead of failing.

use crate::schema::ColumnType;

/// Type emitted into generated declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmittedType {
    /// `string`
    String,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// `string | Date`
    StringOrDate,
    /// `string[]`
    StringArray,
    /// `string | { id: string }`, refined with the target type when resolvable
    Link,
    /// `unknown`
    Unknown,
}

impl EmittedType {
    /// Render in TypeScript type syntax (also used inside JSDoc).
    ///
    /// `link_target` is the generated type name of the linked table; it is
    /// ignored for non-link types.
    pub fn render(&self, link_target: Option<&str>) -> String {
        match self {
            Self::String => "string".to_string(),
            Self::Number => "number".to_string(),
            Self::Boolean => "boolean".to_string(),
            Self::StringOrDate => "string | Date".to_string(),
            Self::StringArray => "string[]".to_string(),
            Self::Link => match link_target {
                Some(target) => format!("string | ({} & {{ id: string }})", target),
                None => "string | { id: string }".to_string(),
            },
            Self::Unknown => "unknown".to_string(),
        }
    }
}

/// Runtime validation rule for a single value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatorRule {
    String,
    Number,
    Boolean,
    Date,
    /// Accepts anything.
    Unknown,
    Array(Box<ValidatorRule>),
    Union(Vec<ValidatorRule>),
    /// Object with the listed required keys; extra keys pass through.
    Object(Vec<(String, ValidatorRule)>),
}

impl ValidatorRule {
    /// Short description used in violation messages.
    pub fn describe(&self) -> String {
        match self {
            Self::String => "string".to_string(),
            Self::Number => "number".to_string(),
            Self::Boolean => "boolean".to_string(),
            Self::Date => "date".to_string(),
            Self::Unknown => "unknown".to_string(),
            Self::Array(inner) => format!("array<{}>", inner.describe()),
            Self::Union(rules) => rules
                .iter()
                .map(|r| r.describe())
                .collect::<Vec<_>>()
                .join(" | "),
            Self::Object(fields) => {
                let fields: Vec<String> = fields
                    .iter()
                    .map(|(name, rule)| format!("{}: {}", name, rule.describe()))
                    .collect();
                format!("{{ {} }}", fields.join(", "))
            }
        }
    }
}

/// The pair produced by the type mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping {
    pub emitted: EmittedType,
    pub rule: ValidatorRule,
}

/// Map a column type to its emitted type and validator rule.
pub fn map_type(column_type: &ColumnType) -> TypeMapping {
    let (emitted, rule) = match column_type {
        ColumnType::String | ColumnType::Text | ColumnType::Email => {
            (EmittedType::String, ValidatorRule::String)
        }
        ColumnType::Int | ColumnType::Float => (EmittedType::Number, ValidatorRule::Number),
        ColumnType::Bool => (EmittedType::Boolean, ValidatorRule::Boolean),
        ColumnType::Datetime => (
            EmittedType::StringOrDate,
            ValidatorRule::Union(vec![ValidatorRule::String, ValidatorRule::Date]),
        ),
        ColumnType::Multiple => (
            EmittedType::StringArray,
            ValidatorRule::Array(Box::new(ValidatorRule::String)),
        ),
        ColumnType::Link => (
            EmittedType::Link,
            ValidatorRule::Union(vec![
                ValidatorRule::String,
                ValidatorRule::Object(vec![("id".to_string(), ValidatorRule::String)]),
            ]),
        ),
        ColumnType::Unknown(name) => {
            tracing::debug!(column_type = %name, "unrecognised column type, using unknown");
            (EmittedType::Unknown, ValidatorRule::Unknown)
        }
    };
    TypeMapping { emitted, rule }
}

/// Map a raw type name. Never fails.
pub fn map_type_name(name: &str) -> TypeMapping {
    map_type(&ColumnType::parse(name))
}
