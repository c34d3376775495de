//! TypeScript rendering: interfaces for records, typed repository classes.

use super::{field_type, Renderer};
use crate::ident::{self, string_literal};
use crate::index::{SchemaIndex, TableEntry};

pub struct TypeScript;

impl Renderer for TypeScript {
    fn prelude(&self) -> String {
        let mut out = String::new();
        out.push_str("export interface RecordClient {\n");
        out.push_str("  query<T>(table: string, filter?: object): Promise<T[]>;\n");
        out.push_str("  read<T>(table: string, id: string): Promise<T | null>;\n");
        out.push_str("  create<T>(table: string, record: Partial<T>): Promise<T>;\n");
        out.push_str("  update<T>(table: string, id: string, patch: Partial<T>): Promise<T | null>;\n");
        out.push_str("  delete(table: string, id: string): Promise<boolean>;\n");
        out.push_str("}\n");
        out
    }

    fn record(&self, entry: &TableEntry<'_>, index: &SchemaIndex<'_>) -> String {
        let mut out = format!("export interface {} {{\n", entry.record_type());
        for col in &entry.table.columns {
            out.push_str(&format!(
                "  {}?: {} | null;\n",
                ident::resolve(&col.name).key(),
                field_type(col, index)
            ));
        }
        out.push_str("}\n");
        out
    }

    fn repository(&self, entry: &TableEntry<'_>) -> String {
        let record = entry.record_type();
        let repo = entry.repository_type();

        let mut out = format!("export class {} {{\n", repo);
        out.push_str(&format!(
            "  static readonly table = {};\n\n",
            string_literal(&entry.table.name)
        ));
        out.push_str("  constructor(private readonly client: RecordClient) {}\n\n");

        out.push_str(&format!("  query(filter?: Partial<{record}>): Promise<{record}[]> {{\n"));
        out.push_str(&format!("    return this.client.query<{record}>({repo}.table, filter);\n"));
        out.push_str("  }\n\n");

        out.push_str(&format!("  read(id: string): Promise<{record} | null> {{\n"));
        out.push_str(&format!("    return this.client.read<{record}>({repo}.table, id);\n"));
        out.push_str("  }\n\n");

        out.push_str(&format!("  create(record: Partial<{record}>): Promise<{record}> {{\n"));
        out.push_str(&format!("    return this.client.create<{record}>({repo}.table, record);\n"));
        out.push_str("  }\n\n");

        out.push_str(&format!(
            "  update(id: string, patch: Partial<{record}>): Promise<{record} | null> {{\n"
        ));
        out.push_str(&format!("    return this.client.update<{record}>({repo}.table, id, patch);\n"));
        out.push_str("  }\n\n");

        out.push_str("  delete(id: string): Promise<boolean> {\n");
        out.push_str(&format!("    return this.client.delete({repo}.table, id);\n"));
        out.push_str("  }\n\n");

        out.push_str(&format!(
            "  static decode(raw: Record<string, unknown>): {record} {{\n"
        ));
        if entry.table.columns.is_empty() {
            out.push_str("    return {};\n");
        } else {
            out.push_str("    return {\n");
            for col in &entry.table.columns {
                let accessor = ident::resolve(&col.name);
                out.push_str(&format!(
                    "      {}: {} as {}[{}],\n",
                    accessor.property(),
                    accessor.access("raw"),
                    record,
                    string_literal(&col.name)
                ));
            }
            out.push_str("    };\n");
        }
        out.push_str("  }\n");
        out.push_str("}\n");
        out
    }

    fn registry(&self, index: &SchemaIndex<'_>) -> String {
        let mut out = String::from("export function repositories(client: RecordClient) {\n");
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
        out.push_str("export type Repositories = ReturnType<typeof repositories>;\n\n");

        let names: Vec<String> = index
            .entries()
            .map(|e| string_literal(&e.table.name))
            .collect();
        out.push_str(&format!("export const tables = [{}] as const;\n", names.join(", ")));
        out
    }
}
