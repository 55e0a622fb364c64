use super::output_parse::{content_from_envelope, safe_json};
use super::{ChatMessage, ProviderError, TextGenerator};
use crate::config::DEFAULT_MODEL;
use crate::runtime::{append_runtime_log, StatePaths};
use serde_json::Value;

pub const JSON_CORRECTION_MESSAGE: &str =
    "Верни только валидный JSON. Без пояснений, без markdown и без ```.";

const JSON_ATTEMPTS: usize = 2;
const SNIPPET_CHARS: usize = 200;

/// Configured model first, then the built-in default; blanks and repeats dropped.
pub fn dedupe_candidates(primary: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for candidate in [primary.trim(), DEFAULT_MODEL] {
        if candidate.is_empty() || out.iter().any(|seen| seen == candidate) {
            continue;
        }
        out.push(candidate.to_string());
    }
    out
}

/// Drives a [`TextGenerator`] through the model-candidate list and the
/// strict-JSON retry protocol.
pub struct ModelRunner<G> {
    generator: G,
    candidates: Vec<String>,
    review_model: String,
    log_paths: Option<StatePaths>,
}

impl<G: TextGenerator> ModelRunner<G> {
    pub fn new(generator: G, methodologist_model: &str, review_model: &str) -> Self {
        Self {
            generator,
            candidates: dedupe_candidates(methodologist_model),
            review_model: review_model.trim().to_string(),
            log_paths: None,
        }
    }

    pub fn with_log_paths(mut self, paths: StatePaths) -> Self {
        self.log_paths = Some(paths);
        self
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn log_paths(&self) -> Option<&StatePaths> {
        self.log_paths.as_ref()
    }

    fn log(&self, level: &str, event: &str, message: &str) {
        if let Some(paths) = &self.log_paths {
            append_runtime_log(paths, level, event, message);
        }
    }

    /// One completion against a single model, without fallback.
    pub fn chat_with_model(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, ProviderError> {
        let envelope = self.generator.complete(model, messages)?;
        content_from_envelope(&envelope)
    }

    /// First candidate that yields a well-formed envelope wins. Returns the
    /// content and the model that produced it.
    pub fn chat_once(&self, messages: &[ChatMessage]) -> Result<(String, String), ProviderError> {
        let mut errors = Vec::new();
        for model in &self.candidates {
            match self.chat_with_model(model, messages) {
                Ok(content) => return Ok((content, model.clone())),
                Err(err) => {
                    self.log(
                        "warn",
                        "provider.candidate_failed",
                        &format!("model={model} error={err}"),
                    );
                    errors.push(format!("{model}: {err}"));
                }
            }
        }
        if errors.is_empty() {
            return Err(ProviderError::Candidates("No available model".to_string()));
        }
        Err(ProviderError::Candidates(errors.join("; ")))
    }

    /// Completion that must parse as JSON. A parse failure is retried once
    /// with a corrective user message appended.
    pub fn call_json(&self, messages: &[ChatMessage]) -> Result<Value, ProviderError> {
        let mut messages = messages.to_vec();
        let mut last_error = String::new();
        let mut last_content = String::new();

        for attempt in 0..JSON_ATTEMPTS {
            let (content, model) = self.chat_once(&messages)?;
            last_content = content.trim().trim_start_matches('\u{feff}').to_string();
            match safe_json(Some(&last_content)) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    self.log(
                        "warn",
                        "provider.retry",
                        &format!("model={model} attempt={} error={err}", attempt + 1),
                    );
                    last_error = err.to_string();
                    messages.push(ChatMessage::user(JSON_CORRECTION_MESSAGE));
                }
            }
        }

        let snippet = if last_content.chars().count() > SNIPPET_CHARS {
            let head: String = last_content.chars().take(SNIPPET_CHARS).collect();
            format!("{head}...")
        } else {
            last_content
        };
        Err(ProviderError::JsonRetriesExhausted {
            reason: last_error,
            snippet,
        })
    }

    pub fn review_model(&self) -> &str {
        if self.review_model.is_empty() {
            DEFAULT_MODEL
        } else {
            self.review_model.as_str()
        }
    }

    /// Free-text review against the review model only.
    pub fn review(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        self.chat_with_model(self.review_model(), messages)
            .map(|content| content.trim().to_string())
    }
}
