//! Client for the external OpenAI-compatible classification service.
//!
//! Turns free-text issue/PR comments into one of the fixed intent values and
//! rewrites draft task descriptions into agent-ready prompts. The service is
//! opaque; the only contract is the chat-completions request/response shape.

mod client;
mod types;

pub use client::{ClassifierClient, ClassifierConfig};
pub use types::{ChatCompletionRequest, ChatMessage, ClassifierError};
