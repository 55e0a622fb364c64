//! Per-operation generation: prompt, strict JSON or plain list, then the
//! deterministic fallback when generation fails or ignores the language.

pub mod countermeasures;
pub mod metrics;
pub mod naming;
pub mod report;
pub mod step2;
pub mod step3;
pub mod why;

pub use countermeasures::CountermeasureSuggestions;
pub use step2::Step2Proposal;
pub use step3::{ContextExamples, Step3Context};
pub use why::WhySuggestions;

use crate::provider::{extract_llm_list, ModelRunner, TextGenerator};
use crate::runtime::append_runtime_log;
use crate::shared::text::normalize_list;
use serde::Serialize;
use serde_json::Value;

pub const SUGGESTION_LIMIT: usize = 5;

/// Entry point for every generated suggestion set.
pub struct Proposals<G> {
    runner: ModelRunner<G>,
}

impl<G: TextGenerator> Proposals<G> {
    pub fn new(runner: ModelRunner<G>) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &ModelRunner<G> {
        &self.runner
    }

    fn log_fallback(&self, operation: &str, reason: &str) {
        if let Some(paths) = self.runner.log_paths() {
            append_runtime_log(
                paths,
                "warn",
                "proposals.fallback",
                &format!("operation={operation} reason={reason}"),
            );
        }
    }
}

/// Compact JSON rendering of prompt context values.
pub(crate) fn compact_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

pub(crate) fn pretty_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// Items of a plain-text answer. A JSON list, or a JSON object holding a
/// list under one of `keys`, is accepted too.
pub(crate) fn plain_list(raw: &str, keys: &[&str]) -> Vec<String> {
    let parsed = if raw.is_empty() {
        None
    } else {
        serde_json::from_str::<Value>(raw).ok()
    };
    let from_json = match &parsed {
        Some(Value::Array(_)) => crate::provider::output_parse::string_list(parsed.as_ref()),
        Some(Value::Object(map)) => keys
            .iter()
            .find_map(|key| map.get(*key).filter(|value| value.is_array()))
            .map(|value| crate::provider::output_parse::string_list(Some(value)))
            .unwrap_or_default(),
        _ => Vec::new(),
    };
    if !from_json.is_empty() {
        return from_json;
    }
    extract_llm_list(raw)
}

pub(crate) fn limited(items: Vec<String>, limit: usize) -> Vec<String> {
    normalize_list(items, limit)
}
