/// TableRAG system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum rows scanned per table and distinct values kept per column
/// when building the cell index.
pub const DEFAULT_CELL_ENCODING_BUDGET: usize = 1000;

/// Maximum execution attempts per query (initial attempt plus healed retries).
pub const DEFAULT_RETRY_EXECUTE: usize = 3;

/// Sample values longer than this are truncated with an ellipsis marker
/// in the rendered schema.
pub const DEFAULT_MAX_SAMPLE_LENGTH: usize = 100;

/// Drill-down rounds after the primary answer.
pub const DEFAULT_DIG_DEEPER_DEPTH: usize = 1;

/// Column-name suffix that triggers an inferred join hint in the rendered
/// schema. A column `department_id` is hinted as joinable to a table named
/// `department` (or `departments`) if one exists.
pub const INFERRED_JOIN_SUFFIX: &str = "_id";
