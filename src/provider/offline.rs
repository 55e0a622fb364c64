use super::{ChatMessage, ProviderError, TextGenerator};
use serde_json::Value;

/// Generator for machines without network access. Every proposal takes its
/// deterministic fallback path.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGenerator;

impl TextGenerator for OfflineGenerator {
    fn complete(&self, _model: &str, _messages: &[ChatMessage]) -> Result<Value, ProviderError> {
        Err(ProviderError::Unavailable(
            "offline provider configured".to_string(),
        ))
    }
}
