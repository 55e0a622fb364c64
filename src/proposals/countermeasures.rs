use super::{limited, plain_list, pretty_json, Proposals, SUGGESTION_LIMIT};
use crate::fallback::countermeasure_fallback;
use crate::prompts::{self, CountermeasurePromptInput};
use crate::provider::TextGenerator;
use crate::shared::text::latin_dominates;
use crate::store::StepsData;

const ACTION_KEYS: &[&str] = &["actions", "countermeasures", "items"];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CountermeasureSuggestions {
    pub actions: Vec<String>,
    pub llm_raw: String,
    pub llm_error: String,
}

impl<G: TextGenerator> Proposals<G> {
    /// Countermeasure ideas for one root cause, with the project context the
    /// prompt needs taken from `steps`.
    pub fn countermeasures(&self, root_cause: &str, steps: &StepsData) -> CountermeasureSuggestions {
        let process_context = pretty_json(&steps.process_context);
        let problem_spec = pretty_json(&steps.problem_spec);
        let current_metrics = pretty_json(&steps.current_state_metrics);
        let target_metrics = pretty_json(&steps.target_state_metrics);
        let messages = prompts::countermeasures(&CountermeasurePromptInput {
            root_cause,
            process_context: &process_context,
            problem_spec: &problem_spec,
            current_metrics: &current_metrics,
            target_metrics: &target_metrics,
        })
        .messages();

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

        let mut actions = plain_list(&llm_raw, ACTION_KEYS);
        if !actions.is_empty() && latin_dominates(&actions.join(" ")) {
            actions.clear();
        }
        if actions.is_empty() {
            actions = countermeasure_fallback(root_cause);
            if llm_error.is_empty() {
                llm_error = "fallback_only".to_string();
            }
            self.log_fallback("countermeasures", &llm_error);
        }

        CountermeasureSuggestions {
            actions: limited(actions, SUGGESTION_LIMIT),
            llm_raw,
            llm_error,
        }
    }
}
