//! # tablerag-core
//!
//! Foundation crate for the TableRAG NL-to-SQL pipeline.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod observability;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::{LlmConfig, PipelineConfig, TableRagConfig};
pub use errors::{TableRagError, TableRagResult};
pub use models::{
    ChatMessage, Column, ConversationLog, ExecutionResult, ExpansionHint, ForeignKeyEdge,
    RelevantCells, Schema, TableSchema,
};
pub use traits::Completion;
