//! Explicit configuration passed into the pipeline at construction.
//!
//! No ambient globals: the completion-service endpoint and the pipeline
//! knobs are plain values, built once from TOML and/or the environment
//! (`LLM_API_SERVER`, `LLM_API_KEY`, `LLM_MODEL`) and handed to
//! `TableRag::new`.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Completion-service connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API (e.g. an Ollama endpoint).
    pub base_url: String,
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Model identifier passed with every request.
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_string(),
            api_key: "ollama".to_string(),
            model: "mistral-nemo".to_string(),
        }
    }
}

impl LlmConfig {
    /// Build from `LLM_API_SERVER` / `LLM_API_KEY` / `LLM_MODEL`,
    /// falling back to defaults for unset variables.
    pub fn from_env() -> Self {
        let base = Self::default();
        Self {
            base_url: std::env::var("LLM_API_SERVER").unwrap_or(base.base_url),
            api_key: std::env::var("LLM_API_KEY").unwrap_or(base.api_key),
            model: std::env::var("LLM_MODEL").unwrap_or(base.model),
        }
    }
}

/// Pipeline behavior knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Max rows scanned per table and distinct values kept per column
    /// when building the cell index.
    pub cell_encoding_budget: usize,
    /// Max execution attempts per query (initial attempt included).
    pub retry_execute: usize,
    /// Sample values longer than this are truncated in the rendered schema.
    pub max_sample_length: usize,
    /// Drill-down rounds after the primary answer.
    pub dig_deeper_depth: usize,
    /// Directory holding the prompt template files.
    pub prompts_dir: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cell_encoding_budget: constants::DEFAULT_CELL_ENCODING_BUDGET,
            retry_execute: constants::DEFAULT_RETRY_EXECUTE,
            max_sample_length: constants::DEFAULT_MAX_SAMPLE_LENGTH,
            dig_deeper_depth: constants::DEFAULT_DIG_DEEPER_DEPTH,
            prompts_dir: "prompts".to_string(),
        }
    }
}

/// Top-level configuration for one pipeline session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableRagConfig {
    pub llm: LlmConfig,
    pub pipeline: PipelineConfig,
}

impl TableRagConfig {
    /// Parse from a TOML document. Unknown keys are ignored; missing
    /// sections fall back to defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Environment-driven configuration with default pipeline knobs.
    pub fn from_env() -> Self {
        Self {
            llm: LlmConfig::from_env(),
            pipeline: PipelineConfig::default(),
        }
    }
}
