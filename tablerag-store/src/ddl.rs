//! Render the schema snapshot as compact DDL text for prompts.
//!
//! Each table becomes a `CREATE TABLE` statement followed by comment lines
//! carrying sample values, declared foreign-key joins, and inferred join
//! hints. This text is the canonical schema representation injected into
//! every downstream prompt, kept compact to bound prompt size.

use tablerag_core::constants::INFERRED_JOIN_SUFFIX;
use tablerag_core::models::{Schema, TableSchema};

/// Render the whole schema. Deterministic for a fixed snapshot: tables and
/// columns appear in enumeration order, nothing is sorted or hashed.
pub fn render_as_ddl(schema: &Schema) -> String {
    let mut out = String::new();
    for table in &schema.tables {
        if !out.is_empty() {
            out.push('\n');
        }
        render_table(&mut out, schema, table);
    }
    out
}

fn render_table(out: &mut String, schema: &Schema, table: &TableSchema) {
    out.push_str(&format!("CREATE TABLE {} (\n", table.name));
    for (idx, column) in table.columns.iter().enumerate() {
        let sep = if idx + 1 < table.columns.len() { "," } else { "" };
        out.push_str(&format!("  {} {}{}\n", column.name, column.declared_type, sep));
    }
    out.push_str(");\n");

    let samples: Vec<String> = table
        .columns
        .iter()
        .filter_map(|c| c.sample.as_ref().map(|s| format!("{}={}", c.name, s)))
        .collect();
    if !samples.is_empty() {
        out.push_str(&format!("-- sample: {}\n", samples.join(", ")));
    }

    for fk in &table.foreign_keys {
        out.push_str(&format!(
            "-- fk: {}.{} -> {}.{}\n",
            fk.table, fk.from_column, fk.to_table, fk.to_column
        ));
    }

    for hint in inferred_join_hints(schema, table) {
        out.push_str(&format!("-- join hint (inferred): {hint}\n"));
    }
}

/// Naming-convention join hints: a column ending in `_id` whose stem names
/// another table (exactly, or with a trailing `s`) is hinted as joinable to
/// that table's key. Heuristic and possibly wrong; advisory text only,
/// never enforced.
fn inferred_join_hints(schema: &Schema, table: &TableSchema) -> Vec<String> {
    let mut hints = Vec::new();
    for column in &table.columns {
        let Some(stem) = column.name.strip_suffix(INFERRED_JOIN_SUFFIX) else {
            continue;
        };
        if stem.is_empty() {
            continue;
        }

        let target = schema.tables.iter().find(|t| {
            t.name != table.name
                && (t.name.eq_ignore_ascii_case(stem)
                    || t.name.eq_ignore_ascii_case(&format!("{stem}s")))
        });
        if let Some(target) = target {
            // Already covered by a declared constraint? Skip the guess.
            let declared = table
                .foreign_keys
                .iter()
                .any(|fk| fk.from_column == column.name && fk.to_table == target.name);
            if !declared {
                hints.push(format!(
                    "{}.{} may join {}.{}",
                    table.name,
                    column.name,
                    target.name,
                    table_key(target)
                ));
            }
        }
    }
    hints
}

/// The target side of an inferred hint: an `id` column when the table has
/// one, else its first column, else the implicit rowid.
fn table_key(table: &TableSchema) -> &str {
    table
        .columns
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case("id"))
        .or_else(|| table.columns.first())
        .map_or("rowid", |c| c.name.as_str())
}
