//! Drill-down: propose a follow-up query refining a prior answer.
//!
//! The prompt is built inline from the prior query, result, question, and
//! explanation (there is no template file for this stage). Extraction
//! failure is fatal to the drill-down step only; the primary answer has
//! already been delivered.

use tracing::{debug, info};

use tablerag_core::errors::{PipelineError, TableRagResult};
use tablerag_core::models::ChatMessage;
use tablerag_core::traits::Completion;
use tablerag_llm::extract_fenced_block;

pub struct DigDeeper<'a> {
    completion: &'a dyn Completion,
}

impl<'a> DigDeeper<'a> {
    pub fn new(completion: &'a dyn Completion) -> Self {
        Self { completion }
    }

    /// One completion call producing a fenced ```sql refinement query.
    pub async fn propose_followup(
        &self,
        sql: &str,
        result_text: &str,
        nl_query: &str,
        explanation: &str,
    ) -> TableRagResult<String> {
        let prompt = format!(
            "The user asked: {nl_query}\n\n\
             This SQL query was executed:\n```sql\n{sql}\n```\n\n\
             It returned:\n{result_text}\n\n\
             The result was explained as: {explanation}\n\n\
             Propose one follow-up SQL query that digs deeper into this \
             result to refine the answer. Respond with the query in a \
             fenced ```sql block."
        );

        let response = self.completion.complete(&[ChatMessage::user(prompt)]).await?;
        debug!(response_len = response.len(), "dig-deeper response received");

        let followup = extract_fenced_block(&response, "sql").ok_or_else(|| {
            PipelineError::DigDeeperParse {
                reason: "response contains no fenced sql block".to_string(),
            }
        })?;

        info!(sql = %followup, "follow-up query proposed");
        Ok(followup)
    }
}
