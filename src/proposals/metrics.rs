use super::{compact_json, Proposals, SUGGESTION_LIMIT};
use crate::prompts::{self, ProblemsPromptInput};
use crate::provider::output_parse::string_list;
use crate::provider::{ProviderError, TextGenerator};
use crate::shared::text::normalize_list;
use crate::store::{CurrentMetric, ProblemSpec, ProcessContext, TargetMetric};

/// Everything the step-6 problem prompt is built from.
pub struct ProblemContext<'a> {
    pub raw_problem: &'a str,
    pub problem_spec: &'a ProblemSpec,
    pub process_context: &'a ProcessContext,
    pub current_metrics: &'a [CurrentMetric],
    pub target_metrics: &'a [TargetMetric],
}

impl<G: TextGenerator> Proposals<G> {
    /// Current-state metric ideas. There is no local fallback; the caller
    /// reports the failure.
    pub fn step4_metrics(
        &self,
        raw_problem: &str,
        problem_spec: &ProblemSpec,
        ctx: &ProcessContext,
    ) -> Result<Vec<String>, ProviderError> {
        let messages =
            prompts::step4_metrics(raw_problem, &compact_json(problem_spec), &compact_json(ctx))
                .messages();
        let data = self.runner().call_json(&messages)?;
        Ok(normalize_list(
            string_list(data.get("metric_suggestions")),
            SUGGESTION_LIMIT,
        ))
    }

    /// Expert problem statements for the step-6 pool.
    pub fn step6_problems(&self, input: &ProblemContext<'_>) -> Result<Vec<String>, ProviderError> {
        let problem_spec = compact_json(input.problem_spec);
        let process_context = compact_json(input.process_context);
        let current_metrics = compact_json(&input.current_metrics);
        let target_metrics = compact_json(&input.target_metrics);
        let messages = prompts::step6_problems(&ProblemsPromptInput {
            raw_problem: input.raw_problem,
            problem_spec: &problem_spec,
            process_context: &process_context,
            current_metrics: &current_metrics,
            target_metrics: &target_metrics,
        })
        .messages();
        let data = self.runner().call_json(&messages)?;
        Ok(normalize_list(
            string_list(data.get("problems")),
            SUGGESTION_LIMIT,
        ))
    }
}
