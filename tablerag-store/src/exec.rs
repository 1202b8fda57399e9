//! Execute SQL against the store on a short-lived connection.

use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

use tablerag_core::errors::StoreError;
use tablerag_core::models::ExecutionResult;

use crate::{to_store_err, value_to_text};

/// Run one query and collect rows plus column names, values rendered to
/// text. The connection is opened for this call alone and dropped on every
/// exit path, success or store error alike.
pub fn execute(db_path: impl AsRef<Path>, sql: &str) -> Result<ExecutionResult, StoreError> {
    let db_path = db_path.as_ref();
    let conn = Connection::open(db_path).map_err(|e| StoreError::Unreachable {
        path: db_path.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut stmt = conn.prepare(sql).map_err(to_store_err)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
    let column_count = columns.len();

    let mut rows_out = Vec::new();
    let mut rows = stmt.query([]).map_err(to_store_err)?;
    while let Some(row) = rows.next().map_err(to_store_err)? {
        let mut values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            values.push(value_to_text(row.get_ref(idx).map_err(to_store_err)?));
        }
        rows_out.push(values);
    }

    debug!(rows = rows_out.len(), columns = column_count, "query executed");
    Ok(ExecutionResult::new(rows_out, columns))
}
