//! # tablerag-pipeline
//!
//! The retrieval-augmented NL-to-SQL pipeline. One [`TableRag`] engine per
//! session owns the schema snapshot, the cell index, the prompt library,
//! and the completion client; each stage issues exactly one blocking
//! external call and the flow suspends until it returns.
//!
//! Control flow per query:
//! expansion → cell lookup → generation → execution (↔ healing) →
//! explanation → drill-down rounds (each re-entering execution).

pub mod classify;
pub mod deeper;
pub mod engine;
pub mod executor;
pub mod expansion;
pub mod explain;
pub mod generation;
pub mod healing;
pub mod prompts;
pub mod report;

pub use engine::{Answer, FollowupRound, TableRag};
pub use prompts::PromptLibrary;
pub use report::render_table;
