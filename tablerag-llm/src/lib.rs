//! # tablerag-llm
//!
//! The completion-service side of the pipeline: an OpenAI-compatible chat
//! client implementing the [`Completion`] trait, plus helpers for pulling
//! fenced blocks out of model responses and parsing their JSON leniently.
//!
//! [`Completion`]: tablerag_core::traits::Completion

pub mod client;
pub mod extract;
pub mod types;

pub use client::ChatClient;
pub use extract::{extract_fenced_block, parse_lenient_json};
