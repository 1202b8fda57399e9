//! SQL generation: schema text, the NL question, and the cell-filtered
//! hints combined into one completion call that must emit fenced SQL.

use std::collections::BTreeMap;

use tracing::{debug, info};

use tablerag_core::errors::{PipelineError, TableRagResult};
use tablerag_core::models::{ChatMessage, ExpansionHint, RelevantCells};
use tablerag_core::traits::Completion;
use tablerag_llm::extract_fenced_block;

use crate::prompts::PromptTemplate;

pub struct SqlGenerator<'a> {
    completion: &'a dyn Completion,
    template: &'a PromptTemplate,
}

impl<'a> SqlGenerator<'a> {
    pub fn new(completion: &'a dyn Completion, template: &'a PromptTemplate) -> Self {
        Self { completion, template }
    }

    /// One completion call. `relevant_cells` covers every indexed table,
    /// not only tables implicated by the hinted columns, so the generator
    /// stays agnostic about which tables matter. Absence of a fenced
    /// ```sql block is fatal; there is no fallback heuristic extraction.
    pub async fn generate(
        &self,
        nl_query: &str,
        schema_text: &str,
        hint: &ExpansionHint,
        relevant_cells: &BTreeMap<String, RelevantCells>,
    ) -> TableRagResult<String> {
        let columns = hint.columns.join(", ");
        let cells_json = serde_json::to_string_pretty(relevant_cells).map_err(|e| {
            PipelineError::GenerationParse {
                reason: format!("relevant cells not serializable: {e}"),
            }
        })?;

        let prompt = self.template.render(&[
            ("schema", schema_text),
            ("user_query", nl_query),
            ("columns", &columns),
            ("cell_values", &cells_json),
        ]);
        let response = self.completion.complete(&[ChatMessage::user(prompt)]).await?;
        debug!(response_len = response.len(), "generation response received");

        let sql = extract_fenced_block(&response, "sql").ok_or_else(|| {
            PipelineError::GenerationParse {
                reason: "response contains no fenced sql block".to_string(),
            }
        })?;

        info!(sql = %sql, "sql generated");
        Ok(sql)
    }
}
