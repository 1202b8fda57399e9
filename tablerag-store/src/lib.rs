//! # tablerag-store
//!
//! SQLite access layer for the TableRAG pipeline. Every operation opens a
//! short-lived connection scoped to the call, so concurrent sessions never
//! share connection state and no connection outlives the operation that
//! needed it; on error paths the connection drops with the scope.

pub mod cells;
pub mod ddl;
pub mod exec;
pub mod introspect;

pub use cells::CellIndex;
pub use introspect::SchemaIntrospector;

use tablerag_core::errors::StoreError;

/// Map a rusqlite error into the store error kind.
pub(crate) fn to_store_err(e: rusqlite::Error) -> StoreError {
    StoreError::Sqlite {
        message: e.to_string(),
    }
}

/// Render one SQLite value to text. NULLs become empty strings; blobs are
/// rendered as a length marker rather than raw bytes.
pub(crate) fn value_to_text(value: rusqlite::types::ValueRef<'_>) -> String {
    use rusqlite::types::ValueRef;
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(r) => r.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => format!("<blob {} bytes>", b.len()),
    }
}
