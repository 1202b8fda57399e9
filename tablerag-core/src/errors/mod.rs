//! Typed errors for every pipeline subsystem.
//!
//! Each subsystem gets its own enum; [`TableRagError`] wraps them so callers
//! can match on the stage that failed without losing the underlying kind.

mod completion_error;
mod pipeline_error;
mod store_error;

pub use completion_error::CompletionError;
pub use pipeline_error::PipelineError;
pub use store_error::StoreError;

/// Result alias used across the workspace.
pub type TableRagResult<T> = Result<T, TableRagError>;

/// Top-level error wrapping every subsystem error.
#[derive(Debug, thiserror::Error)]
pub enum TableRagError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("completion error: {0}")]
    Completion(#[from] CompletionError),
}
