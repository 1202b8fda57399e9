use async_trait::async_trait;

use crate::errors::TableRagResult;
use crate::models::ChatMessage;

/// The language-model completion service, treated as a black box: a
/// role-tagged message list in, response text out. The model identifier
/// and transport are the implementation's concern; latency and
/// availability are not the pipeline's.
///
/// Non-streaming: the pipeline suspends on every call until the full
/// response text is available.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> TableRagResult<String>;
}
