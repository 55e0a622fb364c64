use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request to {model} failed: {message}")]
    Request { model: String, message: String },
    #[error("api key environment variable `{0}` is not set")]
    MissingApiKey(String),
    #[error("{0}")]
    Envelope(String),
    #[error("text generation is unavailable: {0}")]
    Unavailable(String),
    #[error("{0}")]
    Candidates(String),
    #[error("{0}")]
    InvalidJson(String),
    #[error("{reason}. LLM content snippet: {snippet}")]
    JsonRetriesExhausted { reason: String, snippet: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Text-generation backend. `complete` returns the raw chat-completion
/// envelope; validating its shape is the runner's job.
pub trait TextGenerator {
    fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<Value, ProviderError>;
}

impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<Value, ProviderError> {
        (**self).complete(model, messages)
    }
}

impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<Value, ProviderError> {
        (**self).complete(model, messages)
    }
}
