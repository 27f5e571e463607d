use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
/// Single chat message in the completions payload.
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
/// OpenAI-compatible chat-completions request body.
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub(crate) choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatChoice {
    pub(crate) message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatChoiceMessage {
    #[serde(default)]
    pub(crate) content: Option<String>,
}

#[derive(Debug, Error)]
/// Failures surfaced by the classification service client.
///
/// An unrecognized verdict is NOT an error; only transport, status, and
/// decode failures reach this type, and callers must not mutate any state
/// when they see one.
pub enum ClassifierError {
    #[error("classifier API key is not configured")]
    MissingApiKey,
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("classifier returned non-success status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("invalid classifier response: {0}")]
    InvalidResponse(String),
}
