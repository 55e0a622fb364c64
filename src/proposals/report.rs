use super::{pretty_json, Proposals};
use crate::plan::PLAN_LIMIT;
use crate::prompts;
use crate::provider::{ProviderError, TextGenerator};
use crate::store::{PlanItem, ProcessContext};
use serde_json::Value;

impl<G: TextGenerator> Proposals<G> {
    /// Turns selected actions into plan items. Non-object entries are skipped.
    pub fn plan(
        &self,
        actions: &[String],
        ctx: &ProcessContext,
    ) -> Result<Vec<PlanItem>, ProviderError> {
        let messages = prompts::plan(actions, &pretty_json(ctx)).messages();
        let data = self.runner().call_json(&messages)?;
        let items = data
            .get("plan")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter(|item| item.is_object())
                    .filter_map(|item| serde_json::from_value::<PlanItem>(item.clone()).ok())
                    .map(|item| PlanItem {
                        action: item.action.trim().to_string(),
                        expected_result: item.expected_result.trim().to_string(),
                        owner: item.owner.trim().to_string(),
                        due: item.due.trim().to_string(),
                    })
                    .take(PLAN_LIMIT)
                    .collect()
            })
            .unwrap_or_default();
        Ok(items)
    }

    /// Rubric review of the project summary against the review model.
    pub fn review(&self, summary: &str) -> Result<String, ProviderError> {
        self.runner().review(&prompts::review(summary).messages())
    }

    /// Draft report as raw JSON; rendering is the caller's concern.
    pub fn hypothesis(
        &self,
        raw_problem: &str,
        spec_text: &str,
        process_text: &str,
    ) -> Result<Value, ProviderError> {
        let messages = prompts::hypothesis(raw_problem, spec_text, process_text).messages();
        self.runner().call_json(&messages)
    }
}
