use super::{compact_json, Proposals, SUGGESTION_LIMIT};
use crate::extract::step3_positional_fallback;
use crate::fallback::{
    STEP3_END_EXAMPLES, STEP3_HINTS, STEP3_METRICS, STEP3_OWNER_EXAMPLES,
    STEP3_PERIMETER_EXAMPLES, STEP3_START_EXAMPLES,
};
use crate::prompts;
use crate::provider::output_parse::{string_field, string_list};
use crate::provider::TextGenerator;
use crate::shared::text::{latin_dominates, normalize_list};
use crate::store::{ProblemSpec, ProcessContext};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContextExamples {
    pub start_event: Vec<String>,
    pub end_event: Vec<String>,
    pub owner: Vec<String>,
    pub perimeter: Vec<String>,
}

impl ContextExamples {
    fn builtin() -> Self {
        let owned = |items: &[&str]| items.iter().map(|item| item.to_string()).collect();
        Self {
            start_event: owned(STEP3_START_EXAMPLES),
            end_event: owned(STEP3_END_EXAMPLES),
            owner: owned(STEP3_OWNER_EXAMPLES),
            perimeter: owned(STEP3_PERIMETER_EXAMPLES),
        }
    }

    fn all_text(&self) -> String {
        [&self.start_event, &self.end_event, &self.owner, &self.perimeter]
            .iter()
            .flat_map(|items| items.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Step3Context {
    pub extracted: ProcessContext,
    pub hints: Vec<String>,
    pub examples: ContextExamples,
    pub metric_suggestions: Vec<String>,
}

fn context_from_value(value: &Value) -> ProcessContext {
    ProcessContext {
        start_event: string_field(value, "start_event"),
        end_event: string_field(value, "end_event"),
        owner: string_field(value, "owner"),
        perimeter: string_field(value, "perimeter"),
        result_metrics: string_list(value.get("result_metrics")),
    }
}

impl<G: TextGenerator> Proposals<G> {
    /// Step-3 hints, examples and metric ideas, plus extraction of `user_text`.
    /// Never fails: a generation error yields positional extraction only.
    pub fn step3_context(
        &self,
        raw_problem: &str,
        problem_spec: &ProblemSpec,
        user_text: &str,
    ) -> Step3Context {
        let messages =
            prompts::step3_context(raw_problem, &compact_json(problem_spec), user_text).messages();
        let mut result = match self.runner().call_json(&messages) {
            Ok(data) => {
                let examples = data.get("examples").cloned().unwrap_or_default();
                Step3Context {
                    extracted: context_from_value(
                        data.get("extracted").unwrap_or(&Value::Null),
                    ),
                    hints: string_list(data.get("hints")),
                    examples: ContextExamples {
                        start_event: string_list(examples.get("start_event")),
                        end_event: string_list(examples.get("end_event")),
                        owner: string_list(examples.get("owner")),
                        perimeter: string_list(examples.get("perimeter")),
                    },
                    metric_suggestions: normalize_list(
                        string_list(data.get("metric_suggestions")),
                        SUGGESTION_LIMIT,
                    ),
                }
            }
            Err(err) => {
                self.log_fallback("step3_context", &err.to_string());
                Step3Context {
                    extracted: step3_positional_fallback(user_text),
                    ..Step3Context::default()
                }
            }
        };

        let combined = [
            result.hints.join(" "),
            result.examples.all_text(),
            result.metric_suggestions.join(" "),
        ]
        .join(" ");
        if latin_dominates(&combined) {
            self.log_fallback("step3_context", "language_guard");
            result.hints = STEP3_HINTS.iter().map(|item| item.to_string()).collect();
            result.examples = ContextExamples::builtin();
            result.metric_suggestions = STEP3_METRICS.iter().map(|item| item.to_string()).collect();
        }
        result
    }
}
