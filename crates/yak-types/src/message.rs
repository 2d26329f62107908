//! Message and wire types for OpenAI-compatible chat completions.

use serde::{Deserialize, Serialize};

/// Text stored in place of an assistant reply that came back with no content.
pub const EMPTY_REPLY_PLACEHOLDER: &str = "[no content returned]";

/// Role of a message participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in a conversation.
///
/// Content is always present: assistant replies with missing content are
/// replaced with [`EMPTY_REPLY_PLACEHOLDER`] before they are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Build an assistant message, substituting the placeholder when the
    /// upstream completion produced empty or absent content.
    pub fn assistant_or_placeholder(content: Option<String>) -> Self {
        match content {
            Some(text) if !text.trim().is_empty() => Self::assistant(text),
            _ => Self::assistant(EMPTY_REPLY_PLACEHOLDER),
        }
    }
}

/// A request to the chat completions endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
}

/// A response from the chat completions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl CompletionResponse {
    /// Content of the first choice, if the response carried one.
    ///
    /// `None` content is a valid API outcome (the caller substitutes a
    /// placeholder); a missing choice is not.
    pub fn into_first_content(self) -> Result<Option<String>, crate::ApiError> {
        self.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(crate::ApiError::NoChoices)
    }
}

/// One completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: AssistantReply,
}

/// The assistant message inside a completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantReply {
    pub role: Role,
    pub content: Option<String>,
}

/// Token usage reported by the API.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}
