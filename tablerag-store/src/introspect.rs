//! Schema introspection: tables, columns, foreign keys, one sample row.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{debug, error};

use tablerag_core::errors::StoreError;
use tablerag_core::models::{Column, ForeignKeyEdge, Schema, TableSchema};

use crate::{to_store_err, value_to_text};

/// Reads table/column/foreign-key metadata and one truncated sample value
/// per column from the store. Runs once at session start; the resulting
/// [`Schema`] is an immutable snapshot.
pub struct SchemaIntrospector {
    db_path: PathBuf,
    max_sample_length: usize,
}

impl SchemaIntrospector {
    pub fn new(db_path: impl AsRef<Path>, max_sample_length: usize) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            max_sample_length,
        }
    }

    /// Enumerate every table and build the schema snapshot.
    ///
    /// Failure to reach the store is non-fatal: the error is logged and an
    /// empty schema is returned, so downstream stages fail visibly on "no
    /// tables" instead of crashing the session.
    pub fn retrieve(&self) -> Schema {
        match self.try_retrieve() {
            Ok(schema) => schema,
            Err(e) => {
                error!(db = %self.db_path.display(), error = %e, "schema retrieval failed");
                Schema::default()
            }
        }
    }

    fn try_retrieve(&self) -> Result<Schema, StoreError> {
        let conn = self.open()?;
        let mut tables = Vec::new();

        for table_name in list_tables(&conn)? {
            let mut columns = table_columns(&conn, &table_name)?;
            let foreign_keys = foreign_keys(&conn, &table_name)?;

            if let Some(sample) = sample_row(&conn, &table_name)? {
                for (column, value) in columns.iter_mut().zip(sample) {
                    column.sample = Some(truncate(&value, self.max_sample_length));
                }
            }

            debug!(table = %table_name, columns = columns.len(), "introspected table");
            tables.push(TableSchema {
                name: table_name,
                columns,
                foreign_keys,
            });
        }

        Ok(Schema { tables })
    }

    fn open(&self) -> Result<Connection, StoreError> {
        Connection::open(&self.db_path).map_err(|e| StoreError::Unreachable {
            path: self.db_path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// All user table names, in `sqlite_master` order (deterministic for a
/// fixed store state).
pub fn list_tables(conn: &Connection) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'")
        .map_err(to_store_err)?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(to_store_err)?;

    let mut tables = Vec::new();
    for row in rows {
        tables.push(row.map_err(to_store_err)?);
    }
    Ok(tables)
}

/// Column name/type pairs for one table, in declaration order.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<Column>, StoreError> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({})", quote_ident(table)))
        .map_err(to_store_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Column {
                name: row.get::<_, String>(1)?,
                declared_type: row.get::<_, String>(2)?,
                sample: None,
            })
        })
        .map_err(to_store_err)?;

    let mut columns = Vec::new();
    for row in rows {
        columns.push(row.map_err(to_store_err)?);
    }
    Ok(columns)
}

/// Declared foreign-key constraints for one table.
pub fn foreign_keys(conn: &Connection, table: &str) -> Result<Vec<ForeignKeyEdge>, StoreError> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA foreign_key_list({})", quote_ident(table)))
        .map_err(to_store_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ForeignKeyEdge {
                table: table.to_string(),
                to_table: row.get::<_, String>(2)?,
                from_column: row.get::<_, String>(3)?,
                // SQLite reports NULL for an implicit primary-key target.
                to_column: row
                    .get::<_, Option<String>>(4)?
                    .unwrap_or_else(|| "rowid".to_string()),
            })
        })
        .map_err(to_store_err)?;

    let mut edges = Vec::new();
    for row in rows {
        edges.push(row.map_err(to_store_err)?);
    }
    Ok(edges)
}

/// First row of an unordered scan, values rendered to text, or `None` for
/// an empty table. No ordering guarantee beyond "whatever the scan yields".
pub fn sample_row(conn: &Connection, table: &str) -> Result<Option<Vec<String>>, StoreError> {
    let mut stmt = conn
        .prepare(&format!("SELECT * FROM {} LIMIT 1", quote_ident(table)))
        .map_err(to_store_err)?;
    let column_count = stmt.column_count();
    let mut rows = stmt.query([]).map_err(to_store_err)?;

    match rows.next().map_err(to_store_err)? {
        Some(row) => {
            let mut values = Vec::with_capacity(column_count);
            for idx in 0..column_count {
                let value = row.get_ref(idx).map_err(to_store_err)?;
                values.push(value_to_text(value));
            }
            Ok(Some(values))
        }
        None => Ok(None),
    }
}

/// Truncate a sample value with an ellipsis marker.
fn truncate(value: &str, max_len: usize) -> String {
    if value.chars().count() > max_len {
        let head: String = value.chars().take(max_len).collect();
        format!("{head}...")
    } else {
        value.to_string()
    }
}

/// Quote an identifier that came from the store's own metadata.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
