// tinsel-core/src/models/chat.rs
use serde::{Deserialize, Serialize};

/// A single message exchanged with the chat endpoint.
/// Held only for the duration of one request/response cycle; never persisted.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ChatMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub content: Option<String>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "user".to_string(),
            content: Some(content.into()),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "assistant".to_string(),
            content: Some(content.into()),
        }
    }
}

/// One candidate reply returned by the endpoint. Only the first is used;
/// any fields beyond `message` are ignored on decode.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Choice {
    pub message: ChatMessage,
}

/// The overall response shape of the chat-completion endpoint.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl ChatResponse {
    /// Content of the first choice's message, if any. Remaining choices are
    /// discarded.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}
