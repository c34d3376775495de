//! Identifier resolution for generated code.
//!
//! Decides whether a table or column name can be written with member access
//! (`record.email`) or needs a computed accessor (`record["table-2"]`).
//!
//! # Grammar
//! ```text
//! identifier = ( ALPHA | "_" | "$" ) ( ALPHA | DIGIT | "_" | "$" )*
//! ```

use nom::{
    bytes::complete::take_while,
    character::complete::satisfy,
    combinator::{all_consuming, recognize},
    sequence::pair,
    IResult,
};

const PROTO: &str = "__proto__";

/// How a name is referenced in generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessor {
    /// `base.name`
    Member(String),
    /// `base["name"]`
    Bracket(String),
}

impl Accessor {
    /// Render a property read on `base`.
    pub fn access(&self, base: &str) -> String {
        match self {
            Self::Member(name) => format!("{}.{}", base, name),
            Self::Bracket(name) => format!("{}[{}]", base, string_literal(name)),
        }
    }

    /// Render the name as a type-literal key.
    pub fn key(&self) -> String {
        match self {
            Self::Member(name) => name.clone(),
            Self::Bracket(name) => string_literal(name),
        }
    }

    /// Render the name as an object-literal key. A plain or quoted
    /// `__proto__` key sets the prototype, so it is always computed.
    pub fn property(&self) -> String {
        match self {
            Self::Member(name) if name == PROTO => format!("[{}]", string_literal(name)),
            _ => self.key(),
        }
    }

    pub fn is_member(&self) -> bool {
        matches!(self, Self::Member(_))
    }
}

/// Resolve the accessor form for `name`. Total: every input gets one.
pub fn resolve(name: &str) -> Accessor {
    if is_identifier(name) {
        Accessor::Member(name.to_string())
    } else {
        Accessor::Bracket(name.to_string())
    }
}

/// True iff `name` matches the identifier grammar.
pub fn is_identifier(name: &str) -> bool {
    all_consuming(parse_identifier)(name).is_ok()
}

fn parse_identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic() || c == '_' || c == '$'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$'),
    ))(input)
}

/// Quote `s` as a double-quoted string literal valid in TypeScript and JavaScript.
pub fn string_literal(s: &str) -> String {
    // JSON string syntax is a subset of JS string literal syntax.
    serde_json::Value::String(s.to_string()).to_string()
}

/// Derive a PascalCase type name from a table name.
///
/// Non-alphanumeric characters split words; the result always satisfies
/// [`is_identifier`]. `"user-posts"` becomes `UserPosts`, `"2fa_codes"`
/// becomes `_2faCodes`, and a name with no usable characters becomes `Table`.
pub fn type_name(table: &str) -> String {
    let mut out = String::new();
    for word in table.split(|c: char| !c.is_ascii_alphanumeric()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
        }
    }

    if out.is_empty() {
        return "Table".to_string();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_names() {
        for name in ["email", "_id", "$meta", "a1", "emailAddress", "A_$9"] {
            assert_eq!(resolve(name), Accessor::Member(name.to_string()), "{name}");
        }
    }

    #[test]
    fn test_bracket_names() {
        for name in ["table-2", "2fa", "", "first name", "a.b", "ünïcode", "-"] {
            assert_eq!(resolve(name), Accessor::Bracket(name.to_string()), "{name:?}");
        }
    }

    #[test]
    fn test_access_rendering() {
        assert_eq!(resolve("email").access("raw"), "raw.email");
        assert_eq!(resolve("table-2").access("raw"), "raw[\"table-2\"]");
        assert_eq!(resolve("say \"hi\"").access("raw"), "raw[\"say \\\"hi\\\"\"]");
    }

    #[test]
    fn test_key_rendering() {
        assert_eq!(resolve("email").key(), "email");
        assert_eq!(resolve("table-2").key(), "\"table-2\"");
        assert_eq!(resolve("").key(), "\"\"");
    }

    #[test]
    fn test_proto_property_is_computed() {
        let proto = resolve("__proto__");
        assert!(proto.is_member());
        assert_eq!(proto.key(), "__proto__");
        assert_eq!(proto.property(), "[\"__proto__\"]");
        assert_eq!(resolve("email").property(), "email");
        assert_eq!(resolve("table-2").property(), "\"table-2\"");
    }

    #[test]
    fn test_type_name() {
        assert_eq!(type_name("users"), "Users");
        assert_eq!(type_name("user-posts"), "UserPosts");
        assert_eq!(type_name("user_posts"), "UserPosts");
        assert_eq!(type_name("table-2"), "Table2");
        assert_eq!(type_name("2fa_codes"), "_2faCodes");
        assert_eq!(type_name("---"), "Table");
        assert_eq!(type_name("ünï"), "N");
        assert_eq!(type_name("üü"), "Table");
        assert!(is_identifier(&type_name("9 lives!")));
    }
}
