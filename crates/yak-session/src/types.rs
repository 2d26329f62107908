//! Session data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use yak_types::{Message, Role, truncate_str};

/// System instruction seeded into every fresh session.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// One persistent conversation: an ordered transcript plus identity metadata.
///
/// Messages are kept in strict insertion order; nothing reorders or
/// deduplicates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub compaction_count: u32,
}

impl Session {
    /// Create a fresh session seeded with the default system instruction.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            messages: vec![Message::system(DEFAULT_SYSTEM_PROMPT)],
            compaction_count: 0,
        }
    }

    /// Append one message to the end of the transcript.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.updated_at = Utc::now();
    }

    /// Append an assistant reply, substituting the empty-reply placeholder
    /// when the completion produced no content.
    pub fn push_assistant(&mut self, content: Option<String>) {
        self.push(Message::assistant_or_placeholder(content));
    }

    /// Short hex prefix of the session ID for display.
    pub fn short_id(&self) -> String {
        self.id.to_string()[..8].to_string()
    }

    /// Preview string from the first user message, for status output.
    pub fn preview(&self) -> String {
        for msg in &self.messages {
            if msg.role == Role::User {
                let trimmed = msg.content.trim();
                if trimmed.len() > 80 {
                    return format!("{}...", truncate_str(trimmed, 77));
                }
                return trimmed.to_string();
            }
        }
        String::new()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
