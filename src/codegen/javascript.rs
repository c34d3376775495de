//! JavaScript rendering: ES module classes typed through JSDoc.

use super::{field_type, Renderer};
use crate::ident::{self, string_literal};
use crate::index::{SchemaIndex, TableEntry};

pub struct JavaScript;

impl Renderer for JavaScript {
    fn prelude(&self) -> String {
        let mut out = String::from("/**\n");
        out.push_str(" * @typedef {Object} RecordClient\n");
        out.push_str(" * @property {(table: string, filter?: object) => Promise<any[]>} query\n");
        out.push_str(" * @property {(table: string, id: string) => Promise<any>} read\n");
        out.push_str(" * @property {(table: string, record: object) => Promise<any>} create\n");
        out.push_str(" * @property {(table: string, id: string, patch: object) => Promise<any>} update\n");
        out.push_str(" * @property {(table: string, id: string) => Promise<boolean>} delete\n");
        out.push_str(" */\n");
        out
    }

    fn record(&self, entry: &TableEntry<'_>, index: &SchemaIndex<'_>) -> String {
        if entry.table.columns.is_empty() {
            return format!("/** @typedef {{{{}}}} {} */\n", entry.record_type());
        }
        let mut out = String::from("/**\n * @typedef {{\n");
        for col in &entry.table.columns {
            out.push_str(&format!(
                " *   {}?: {} | null;\n",
                ident::resolve(&col.name).key(),
                field_type(col, index)
            ));
        }
        out.push_str(&format!(" * }}}} {}\n */\n", entry.record_type()));
        out
    }

    fn repository(&self, entry: &TableEntry<'_>) -> String {
        let record = entry.record_type();
        let repo = entry.repository_type();

        let mut out = format!("export class {} {{\n", repo);
        out.push_str("  /** @param {RecordClient} client */\n");
        out.push_str("  constructor(client) {\n");
        out.push_str("    this.client = client;\n");
        out.push_str("  }\n\n");

        method(
            &mut out,
            &[
                format!("@param {{Partial<{record}>}} [filter]"),
                format!("@returns {{Promise<{record}[]>}}"),
            ],
            "query(filter)",
            &format!("this.client.query({repo}.table, filter)"),
        );
        method(
            &mut out,
            &[
                "@param {string} id".to_string(),
                format!("@returns {{Promise<{record} | null>}}"),
            ],
            "read(id)",
            &format!("this.client.read({repo}.table, id)"),
        );
        method(
            &mut out,
            &[
                format!("@param {{Partial<{record}>}} record"),
                format!("@returns {{Promise<{record}>}}"),
            ],
            "create(record)",
            &format!("this.client.create({repo}.table, record)"),
        );
        method(
            &mut out,
            &[
                "@param {string} id".to_string(),
                format!("@param {{Partial<{record}>}} patch"),
                format!("@returns {{Promise<{record} | null>}}"),
            ],
            "update(id, patch)",
            &format!("this.client.update({repo}.table, id, patch)"),
        );
        method(
            &mut out,
            &[
                "@param {string} id".to_string(),
                "@returns {Promise<boolean>}".to_string(),
            ],
            "delete(id)",
            &format!("this.client.delete({repo}.table, id)"),
        );

        out.push_str("  /**\n");
        out.push_str("   * @param {Record<string, unknown>} raw\n");
        out.push_str(&format!("   * @returns {{{record}}}\n"));
        out.push_str("   */\n");
        out.push_str("  static decode(raw) {\n");
        if entry.table.columns.is_empty() {
            out.push_str("    return {};\n");
        } else {
            out.push_str("    return {\n");
            for col in &entry.table.columns {
                let accessor = ident::resolve(&col.name);
                out.push_str(&format!(
                    "      {}: {},\n",
                    accessor.property(),
                    accessor.access("raw")
                ));
            }
            out.push_str("    };\n");
        }
        out.push_str("  }\n");
        out.push_str("}\n");
        out.push_str(&format!(
            "{}.table = {};\n",
            repo,
            string_literal(&entry.table.name)
        ));
        out
    }

    fn registry(&self, index: &SchemaIndex<'_>) -> String {
        let mut out = String::from("/** @param {RecordClient} client */\n");
        out.push_str("export function repositories(client) {\n");
        out.push_str("  return {\n");
        for entry in index.entries() {
            out.push_str(&format!(
                "    {}: new {}(client),\n",
                ident::resolve(&entry.table.name).property(),
                entry.repository_type()
            ));
        }
        out.push_str("  };\n");
        out.push_str("}\n\n");

        let names: Vec<String> = index
            .entries()
            .map(|e| string_literal(&e.table.name))
            .collect();
        out.push_str(&format!(
            "export const tables = Object.freeze([{}]);\n",
            names.join(", ")
        ));
        out
    }
}

/// Append a documented one-line method to a class body.
fn method(out: &mut String, tags: &[String], signature: &str, body: &str) {
    out.push_str("  /**\n");
    for tag in tags {
        out.push_str(&format!("   * {}\n", tag));
    }
    out.push_str("   */\n");
    out.push_str(&format!("  {} {{\n", signature));
    out.push_str(&format!("    return {};\n", body));
    out.push_str("  }\n\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Schema, Table};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_record_typedef() {
        let schema = Schema::new()
            .table(Table::new("posts").column("title", "text").link("author", "users"))
            .table(Table::new("users").column("table-2", "float"));
        let index = SchemaIndex::build(&schema).unwrap();

        assert_eq!(
            JavaScript.record(&index.entry("posts").unwrap(), &index),
            r#"/**
 * @typedef {{
 *   title?: string | null;
 *   author?: string | (UsersRecord & { id: string }) | null;
 * }} PostsRecord
 */
"#
        );
        assert_eq!(
            JavaScript.record(&index.entry("users").unwrap(), &index),
            "/**\n * @typedef {{\n *   \"table-2\"?: number | null;\n * }} UsersRecord\n */\n"
        );
    }

    #[test]
    fn test_empty_record() {
        let schema = Schema::new().table(Table::new("empty"));
        let index = SchemaIndex::build(&schema).unwrap();
        assert_eq!(
            JavaScript.record(&index.entry("empty").unwrap(), &index),
            "/** @typedef {{}} EmptyRecord */\n"
        );
    }

    #[test]
    fn test_repository_class() {
        let schema = Schema::new().table(Table::new("users").column("email", "string"));
        let index = SchemaIndex::build(&schema).unwrap();
        let repo = JavaScript.repository(&index.entry("users").unwrap());

        assert!(repo.starts_with("export class UsersRepository {\n"));
        assert!(repo.contains("  read(id) {\n    return this.client.read(UsersRepository.table, id);\n  }"));
        assert!(repo.contains("   * @returns {Promise<UsersRecord | null>}"));
        assert!(repo.contains("      email: raw.email,"));
        assert!(repo.ends_with("}\nUsersRepository.table = \"users\";\n"));
    }
}
