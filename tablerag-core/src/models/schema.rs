//! Immutable schema snapshot taken at session start.

use serde::{Deserialize, Serialize};

/// One column of a table, with the declared type and an optional sample
/// value from the first row of an unordered scan. Long samples are
/// truncated with an ellipsis marker at introspection time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub declared_type: String,
    pub sample: Option<String>,
}

/// A declared foreign-key constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyEdge {
    pub table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
}

/// One table: ordered columns plus declared foreign keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<Column>,
    pub foreign_keys: Vec<ForeignKeyEdge>,
}

/// The whole store's schema, in store enumeration order. Built once per
/// session; does not reflect later mutation of the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    pub tables: Vec<TableSchema>,
}

impl Schema {
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Look up a table by name.
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// All table names, in enumeration order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }
}
