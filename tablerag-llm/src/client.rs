//! OpenAI-compatible chat-completion client.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use tablerag_core::config::LlmConfig;
use tablerag_core::errors::{CompletionError, TableRagResult};
use tablerag_core::models::ChatMessage;
use tablerag_core::traits::Completion;

use crate::types::{ApiError, CompletionRequest, CompletionResponse, WireMessage};

/// Non-streaming client for any `POST {base}/chat/completions` endpoint
/// (OpenAI, Ollama's compatibility layer, vLLM, ...). Carries the model
/// identifier so callers only ever see role-tagged messages in, text out.
pub struct ChatClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatClient {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl Completion for ChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> TableRagResult<String> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.clone(),
                    content: m.content.clone(),
                })
                .collect(),
            stream: false,
            temperature: None,
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model, messages = messages.len(), "sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::RequestFailed {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Prefer the service's own error message when it sent one.
            let reason = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(CompletionError::RequestFailed {
                reason: format!("{status}: {reason}"),
            }
            .into());
        }

        let parsed: CompletionResponse =
            response
                .json()
                .await
                .map_err(|e| CompletionError::InvalidResponse {
                    reason: format!("malformed completion body: {e}"),
                })?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| CompletionError::InvalidResponse {
                reason: "no choices in response".to_string(),
            })?;

        Ok(text.trim().to_string())
    }
}
