//! Query-expansion output and its intersection with the cell index.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Structured hint produced by the expansion stage: candidate columns and
/// candidate literal values, untyped strings as received from the model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpansionHint {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub cell_values: Vec<String>,
}

/// Per-table result of intersecting hinted cell values with the indexed
/// distinct values: `column -> values present in both sets`. Columns with
/// an empty intersection are still listed; columns absent from the index
/// are omitted entirely.
pub type RelevantCells = BTreeMap<String, Vec<String>>;
