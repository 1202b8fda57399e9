//! Result of running SQL against the store.

use serde::{Deserialize, Serialize};

/// Rows and column names from one executed query, values rendered to text.
///
/// The terminal-failure sentinel has empty rows *and* empty columns; a
/// successful query that matched nothing keeps its column names, so
/// [`ExecutionResult::is_failure`] can tell the two apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub rows: Vec<Vec<String>>,
    pub columns: Vec<String>,
}

impl ExecutionResult {
    pub fn new(rows: Vec<Vec<String>>, columns: Vec<String>) -> Self {
        Self { rows, columns }
    }

    /// The sentinel yielded when execution and healing are exhausted.
    pub fn failed() -> Self {
        Self::default()
    }

    /// True for the terminal-failure sentinel (no rows, no columns).
    pub fn is_failure(&self) -> bool {
        self.rows.is_empty() && self.columns.is_empty()
    }
}
