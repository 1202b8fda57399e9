//! Query healing: resubmit a failing query with its error message and the
//! schema, hoping for a corrected query back.

use tracing::{debug, warn};

use tablerag_core::models::ChatMessage;
use tablerag_core::traits::Completion;
use tablerag_llm::extract_fenced_block;

use crate::prompts::PromptTemplate;

pub struct QueryHealer<'a> {
    completion: &'a dyn Completion,
    template: &'a PromptTemplate,
}

impl<'a> QueryHealer<'a> {
    pub fn new(completion: &'a dyn Completion, template: &'a PromptTemplate) -> Self {
        Self { completion, template }
    }

    /// One completion call. A fenced ```sql block yields the corrected
    /// query; anything else (including a completion-service failure) is
    /// `None`, which the executor turns into terminal failure.
    pub async fn heal(
        &self,
        failed_sql: &str,
        error_text: &str,
        schema_text: &str,
    ) -> Option<String> {
        let prompt = self.template.render(&[
            ("original_query", failed_sql),
            ("error_message", error_text),
            ("schema", schema_text),
        ]);

        let response = match self.completion.complete(&[ChatMessage::user(prompt)]).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "healing call failed; treating as no correction");
                return None;
            }
        };

        match extract_fenced_block(&response, "sql") {
            Some(sql) => {
                debug!(sql = %sql, "healer proposed a corrected query");
                Some(sql)
            }
            None => {
                debug!("healer response carried no fenced sql block");
                None
            }
        }
    }
}
