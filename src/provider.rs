pub mod offline;
pub mod openai;
pub mod output_parse;
pub mod runner;
pub mod types;

pub use offline::OfflineGenerator;
pub use openai::OpenAiCompatibleGenerator;
pub use output_parse::{content_from_envelope, extract_llm_list, safe_json};
pub use runner::{dedupe_candidates, ModelRunner, JSON_CORRECTION_MESSAGE};
pub use types::{ChatMessage, ProviderError, TextGenerator};

use crate::config::{ProviderKind, Settings};

/// Builds the generator selected by `provider.kind`.
pub fn generator_from_settings(settings: &Settings) -> Box<dyn TextGenerator> {
    match settings.provider.kind {
        ProviderKind::OpenaiCompatible => {
            Box::new(OpenAiCompatibleGenerator::from_settings(&settings.provider))
        }
        ProviderKind::Offline => Box::new(OfflineGenerator),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_content_is_extracted() {
        let envelope = json!({"choices": [{"message": {"content": "привет"}}]});
        assert_eq!(content_from_envelope(&envelope).expect("content"), "привет");
    }

    #[test]
    fn envelope_without_choices_is_rejected() {
        let err = content_from_envelope(&json!({"choices": []})).expect_err("must fail");
        assert_eq!(err.to_string(), "bad_llm_result_choices");

        let err = content_from_envelope(&json!({"choices": [{"message": "text"}]}))
            .expect_err("must fail");
        assert_eq!(err.to_string(), "bad_llm_result_message");

        let err = content_from_envelope(&json!({"choices": [{"message": {"content": null}}]}))
            .expect_err("must fail");
        assert_eq!(err.to_string(), "empty_llm_content");
    }

    #[test]
    fn offline_generator_always_reports_unavailable() {
        let err = OfflineGenerator
            .complete("gpt-5.2", &[ChatMessage::user("hi")])
            .expect_err("offline must fail");
        assert!(err.to_string().contains("offline"));
    }
}
