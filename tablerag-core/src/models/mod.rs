//! Data model shared across the pipeline stages.

mod cells;
mod conversation;
mod execution;
mod schema;

pub use cells::{ExpansionHint, RelevantCells};
pub use conversation::{ChatMessage, ConversationLog, LogEntry};
pub use execution::ExecutionResult;
pub use schema::{Column, ForeignKeyEdge, Schema, TableSchema};
