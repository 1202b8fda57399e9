/// Completion-service errors (the language-model endpoint).
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("invalid completion response: {reason}")]
    InvalidResponse { reason: String },
}
