use super::{limited, plain_list, Proposals, SUGGESTION_LIMIT};
use crate::fallback::why_fallback;
use crate::prompts;
use crate::provider::TextGenerator;
use crate::shared::text::latin_dominates;

const WHY_KEYS: &[&str] = &["why_suggestions", "reasons", "causes", "answers", "items"];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WhySuggestions {
    pub suggestions: Vec<String>,
    pub llm_raw: String,
    pub llm_error: String,
}

impl<G: TextGenerator> Proposals<G> {
    /// Candidate answers to "why?" for `effect`. Always returns at least the
    /// keyword fallback.
    pub fn why(&self, effect: &str) -> WhySuggestions {
        let messages = prompts::why(effect).messages();
        let (llm_raw, mut llm_error) = match self.runner().chat_once(&messages) {
            Ok((content, _)) => {
                let raw = content.trim().trim_start_matches('\u{feff}').to_string();
                let error = if raw.is_empty() {
                    "empty_content".to_string()
                } else {
                    String::new()
                };
                (raw, error)
            }
            Err(err) => (String::new(), format!("llm_error: {err}")),
        };

        let mut suggestions = limited(plain_list(&llm_raw, WHY_KEYS), SUGGESTION_LIMIT);
        if !suggestions.is_empty() && latin_dominates(&suggestions.join(" ")) {
            suggestions.clear();
            if llm_error.is_empty() {
                llm_error = "language_guard".to_string();
            }
        }
        if suggestions.is_empty() {
            self.log_fallback("why", if llm_error.is_empty() { "empty" } else { &llm_error });
            suggestions = why_fallback(effect);
        }

        WhySuggestions {
            suggestions,
            llm_raw,
            llm_error,
        }
    }
}
