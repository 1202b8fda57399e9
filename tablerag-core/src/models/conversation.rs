//! Append-only conversation log of assistant-visible artifacts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One role-tagged message. Roles are plain strings ("user", "assistant",
/// "system") matching the completion service's wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// A logged entry with the time it was appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: ChatMessage,
    pub logged_at: DateTime<Utc>,
}

/// Ordered log of rendered tables and explanations accumulated over a
/// session, for optional later reuse as context. Never pruned or replayed
/// automatically by the pipeline.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    entries: Vec<LogEntry>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message. Entries only ever accumulate.
    pub fn push(&mut self, message: ChatMessage) {
        self.entries.push(LogEntry {
            message,
            logged_at: Utc::now(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }
}
