//! Query expansion: turn the NL question into candidate columns and
//! candidate literal values via one completion call.

use tracing::{debug, info};

use tablerag_core::errors::{PipelineError, TableRagResult};
use tablerag_core::models::{ChatMessage, ExpansionHint};
use tablerag_core::traits::Completion;
use tablerag_llm::{extract_fenced_block, parse_lenient_json};

use crate::prompts::PromptTemplate;

pub struct QueryExpander<'a> {
    completion: &'a dyn Completion,
    template: &'a PromptTemplate,
}

impl<'a> QueryExpander<'a> {
    pub fn new(completion: &'a dyn Completion, template: &'a PromptTemplate) -> Self {
        Self { completion, template }
    }

    /// One completion call; the response must carry a fenced ```json block
    /// with `columns` and `cell_values` (or `possible_cell_values`). Any
    /// parse failure is surfaced as `ExpansionParse`, never swallowed.
    pub async fn expand(
        &self,
        nl_query: &str,
        schema_text: &str,
    ) -> TableRagResult<ExpansionHint> {
        let prompt = self
            .template
            .render(&[("schema", schema_text), ("user_query", nl_query)]);
        let response = self.completion.complete(&[ChatMessage::user(prompt)]).await?;
        debug!(response_len = response.len(), "expansion response received");

        let block = extract_fenced_block(&response, "json").ok_or_else(|| {
            PipelineError::ExpansionParse {
                reason: "response contains no fenced json block".to_string(),
            }
        })?;

        let value = parse_lenient_json(&block).map_err(|e| PipelineError::ExpansionParse {
            reason: format!("unrepairable json: {e}"),
        })?;

        let hint = hint_from_value(&value);
        info!(
            columns = hint.columns.len(),
            cell_values = hint.cell_values.len(),
            "query expanded"
        );
        Ok(hint)
    }
}

/// `columns` defaults empty; `possible_cell_values` is consulted only when
/// the `cell_values` key is absent entirely, so an explicit empty list
/// stays empty.
fn hint_from_value(value: &serde_json::Value) -> ExpansionHint {
    let columns = string_array(value, "columns");
    let cell_values = if value.get("cell_values").is_none() {
        string_array(value, "possible_cell_values")
    } else {
        string_array(value, "cell_values")
    };
    ExpansionHint { columns, cell_values }
}

/// Read an array of strings, defaulting to empty when the key is absent or
/// not an array. Non-string entries are rendered to text rather than
/// dropped, since the model sometimes emits bare numbers as values.
fn string_array(value: &serde_json::Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .map(|v| match v.as_str() {
                    Some(s) => s.to_string(),
                    None => v.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}
