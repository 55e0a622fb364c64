use super::Proposals;
use crate::extract::problem_spec_from_template;
use crate::fallback::step2_default_hints;
use crate::prompts;
use crate::provider::output_parse::{string_field, string_list};
use crate::provider::TextGenerator;
use crate::shared::text::{latin_dominates, normalize_list};
use crate::store::ProblemSpec;

const HINT_LIMIT: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Step2Proposal {
    pub extracted: ProblemSpec,
    pub hints: Vec<String>,
    pub llm_error: Option<String>,
}

impl<G: TextGenerator> Proposals<G> {
    /// Step-2 hints, plus field extraction when `user_text` is non-empty.
    /// On failure the label template is read locally and default hints apply.
    pub fn step2(&self, raw_problem: &str, user_text: &str) -> Step2Proposal {
        let messages = prompts::step2(raw_problem, user_text).messages();
        match self.runner().call_json(&messages) {
            Ok(data) => {
                let extracted_value = data.get("extracted").cloned().unwrap_or_default();
                let mut extracted = ProblemSpec::default();
                for key in ProblemSpec::KEYS {
                    if let Some(slot) = extracted.slot_mut(key) {
                        *slot = string_field(&extracted_value, key);
                    }
                }
                let mut hints = normalize_list(string_list(data.get("hints")), HINT_LIMIT);
                if hints.is_empty() || latin_dominates(&hints.join(" ")) {
                    hints = step2_default_hints();
                }
                Step2Proposal {
                    extracted,
                    hints,
                    llm_error: None,
                }
            }
            Err(err) => {
                self.log_fallback("step2", &err.to_string());
                Step2Proposal {
                    extracted: problem_spec_from_template(user_text),
                    hints: step2_default_hints(),
                    llm_error: Some(err.to_string()),
                }
            }
        }
    }
}
