//! Result explanation: one completion call turning a result set plus the
//! original question into prose.

use tracing::debug;

use tablerag_core::errors::{PipelineError, TableRagResult};
use tablerag_core::models::ChatMessage;
use tablerag_core::traits::Completion;

use crate::prompts::PromptTemplate;

pub struct ResultExplainer<'a> {
    completion: &'a dyn Completion,
    template: &'a PromptTemplate,
}

impl<'a> ResultExplainer<'a> {
    pub fn new(completion: &'a dyn Completion, template: &'a PromptTemplate) -> Self {
        Self { completion, template }
    }

    /// `result_text` is opaque: a rendered table or serialized rows,
    /// substituted verbatim into the prompt. The response comes back
    /// unmodified and unvalidated.
    pub async fn explain(&self, result_text: &str, nl_query: &str) -> TableRagResult<String> {
        let prompt = self
            .template
            .render(&[("query", nl_query), ("result", result_text)]);

        let response = self
            .completion
            .complete(&[ChatMessage::user(prompt)])
            .await
            .map_err(|e| PipelineError::ExplainFailed {
                reason: e.to_string(),
            })?;

        debug!(explanation_len = response.len(), "result explained");
        Ok(response)
    }
}
