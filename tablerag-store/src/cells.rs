//! Budgeted index of distinct observed column values.
//!
//! Built once per session by scanning at most `budget` rows per table;
//! each column keeps at most `budget` distinct values. Later rows beyond
//! the budget are never seen, so rare values may be missed even when
//! frequent ones are not. Values are normalized to text so untyped hints
//! from the model can intersect numeric and temporal columns.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, error};

use tablerag_core::errors::StoreError;
use tablerag_core::models::{RelevantCells, Schema};

use crate::introspect::quote_ident;
use crate::{to_store_err, value_to_text};

/// `table -> column -> distinct observed values` (text-normalized, capped).
#[derive(Debug, Default)]
pub struct CellIndex {
    tables: HashMap<String, HashMap<String, HashSet<String>>>,
}

impl CellIndex {
    /// Scan the store and build the index.
    ///
    /// Like schema retrieval, an unreachable store is logged and degrades
    /// to an empty index rather than failing construction.
    pub fn build(db_path: impl AsRef<Path>, schema: &Schema, budget: usize) -> Self {
        match Self::try_build(db_path.as_ref(), schema, budget) {
            Ok(index) => index,
            Err(e) => {
                error!(error = %e, "cell index build failed");
                Self::default()
            }
        }
    }

    fn try_build(db_path: &Path, schema: &Schema, budget: usize) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path).map_err(|e| StoreError::Unreachable {
            path: db_path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut tables = HashMap::new();
        for table in &schema.tables {
            let columns = scan_table(&conn, &table.name, budget)?;
            if !columns.is_empty() {
                debug!(table = %table.name, columns = columns.len(), "indexed cells");
                tables.insert(table.name.clone(), columns);
            }
        }
        Ok(Self { tables })
    }

    /// Intersect hinted values with a table's indexed sets.
    ///
    /// For each candidate column present in the table's index, returns the
    /// hinted values that actually occur in that column. Unknown tables
    /// yield an empty map; unknown columns are silently omitted. Matching
    /// is exact on the text-normalized forms.
    pub fn lookup(
        &self,
        table: &str,
        candidate_columns: &[String],
        candidate_values: &[String],
    ) -> RelevantCells {
        let mut relevant = RelevantCells::new();
        let Some(columns) = self.tables.get(table) else {
            return relevant;
        };

        for column in candidate_columns {
            if let Some(observed) = columns.get(column) {
                let matched: Vec<String> = candidate_values
                    .iter()
                    .filter(|v| observed.contains(v.trim()))
                    .map(|v| v.trim().to_string())
                    .collect();
                relevant.insert(column.clone(), matched);
            }
        }
        relevant
    }

    /// Indexed table names, unordered.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Number of distinct values indexed for one column.
    pub fn column_cardinality(&self, table: &str, column: &str) -> usize {
        self.tables
            .get(table)
            .and_then(|cols| cols.get(column))
            .map_or(0, HashSet::len)
    }
}

/// Scan up to `budget` rows of one table, accumulating distinct values per
/// column with the per-column cap enforced independently.
fn scan_table(
    conn: &Connection,
    table: &str,
    budget: usize,
) -> Result<HashMap<String, HashSet<String>>, StoreError> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT * FROM {} LIMIT {}",
            quote_ident(table),
            budget
        ))
        .map_err(to_store_err)?;
    let column_names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();

    let mut columns: HashMap<String, HashSet<String>> = HashMap::new();
    let mut rows = stmt.query([]).map_err(to_store_err)?;
    while let Some(row) = rows.next().map_err(to_store_err)? {
        for (idx, name) in column_names.iter().enumerate() {
            let value = value_to_text(row.get_ref(idx).map_err(to_store_err)?);
            let set = columns.entry(name.clone()).or_default();
            if set.len() < budget {
                set.insert(value);
            }
        }
    }
    Ok(columns)
}
