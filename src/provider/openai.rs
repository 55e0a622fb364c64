use super::{ChatMessage, ProviderError, TextGenerator};
use crate::config::ProviderSettings;
use serde_json::{json, Value};
use std::time::Duration;

/// Chat-completions client for any OpenAI-compatible endpoint.
pub struct OpenAiCompatibleGenerator {
    endpoint: String,
    api_key_env: String,
    api_key: Option<String>,
    agent: ureq::Agent,
}

impl OpenAiCompatibleGenerator {
    pub fn new(
        endpoint: impl Into<String>,
        api_key_env: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key_env: api_key_env.into(),
            api_key,
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    pub fn from_settings(settings: &ProviderSettings) -> Self {
        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        Self::new(
            settings.endpoint.clone(),
            settings.api_key_env.clone(),
            api_key,
            Duration::from_secs(settings.timeout_seconds),
        )
    }
}

impl TextGenerator for OpenAiCompatibleGenerator {
    fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<Value, ProviderError> {
        let token = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::MissingApiKey(self.api_key_env.clone()))?;

        let body = json!({
            "model": model,
            "messages": messages,
            "stream": false,
        });

        let response = self
            .agent
            .post(&self.endpoint)
            .set("Authorization", &format!("Bearer {token}"))
            .send_json(body)
            .map_err(|e| ProviderError::Request {
                model: model.to_string(),
                message: e.to_string(),
            })?;

        response
            .into_json::<Value>()
            .map_err(|e| ProviderError::Request {
                model: model.to_string(),
                message: e.to_string(),
            })
    }
}
