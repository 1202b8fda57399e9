//! Input classification: is this free text a natural-language query?

use tracing::debug;

use tablerag_core::errors::TableRagResult;
use tablerag_core::models::ChatMessage;
use tablerag_core::traits::Completion;

use crate::prompts::PromptTemplate;

/// Accepted verbatim classifier verdict.
const NL_QUERY_VERDICT: &str = "Natural Language Query";

pub struct QueryClassifier<'a> {
    completion: &'a dyn Completion,
    template: &'a PromptTemplate,
}

impl<'a> QueryClassifier<'a> {
    pub fn new(completion: &'a dyn Completion, template: &'a PromptTemplate) -> Self {
        Self { completion, template }
    }

    /// True iff the trimmed response matches the verdict exactly.
    pub async fn is_natural_language_query(&self, input_text: &str) -> TableRagResult<bool> {
        let prompt = self.template.render(&[("input_text", input_text)]);
        let response = self.completion.complete(&[ChatMessage::user(prompt)]).await?;
        let verdict = response.trim() == NL_QUERY_VERDICT;
        debug!(verdict, "input classified");
        Ok(verdict)
    }
}
