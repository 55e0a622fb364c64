use super::{StepHandler, TurnContext};
use crate::extract::{parse_metric_values, POOL_MARKER};
use crate::orchestrator::render::{problem_pool, step5_prompt, PROBLEMS_TEMPLATE, REGEN_LINE};
use crate::orchestrator::Reply;
use crate::proposals::metrics::ProblemContext;
use crate::provider::TextGenerator;
use crate::shared::text::normalize_list;
use crate::store::{ProjectState, Step, Step6Phase, TargetMetric};

pub const PROBLEM_POOL_LIMIT: usize = 6;

const NO_CURRENT_METRICS: &str =
    "⚠️ Не найдены метрики шага 4. Сначала выбери метрики текущего состояния.\n\n";

/// Raw problem first, marked as the original, then generated statements.
pub fn build_problem_pool(raw_problem: &str, generated: Vec<String>) -> Vec<String> {
    let mut pool = Vec::new();
    if !raw_problem.is_empty() {
        pool.push(format!("{raw_problem}{POOL_MARKER}"));
    }
    pool.extend(generated);
    normalize_list(pool, PROBLEM_POOL_LIMIT)
}

/// Fetches generated problems; a failed generation leaves only the raw problem.
pub fn refresh_problem_pool<G: TextGenerator>(
    ctx: &TurnContext<'_, G>,
    state: &mut ProjectState,
    raw_problem: &str,
) -> Vec<String> {
    let steps = state.steps();
    let generated = ctx
        .proposals
        .step6_problems(&ProblemContext {
            raw_problem,
            problem_spec: &steps.problem_spec,
            process_context: &steps.process_context,
            current_metrics: &steps.current_state_metrics,
            target_metrics: &steps.target_state_metrics,
        })
        .unwrap_or_default();
    let pool = build_problem_pool(raw_problem, generated);
    state.steps_mut().step6_problem_pool = pool.clone();
    pool
}

/// Step 5: a target value for every step-4 metric.
pub struct TargetMetricsStep;

impl<G: TextGenerator> StepHandler<G> for TargetMetricsStep {
    fn handle(&self, ctx: &TurnContext<'_, G>, state: &mut ProjectState, input: &str) -> Reply {
        let names: Vec<String> = state
            .steps()
            .current_state_metrics
            .iter()
            .map(|m| m.metric.clone())
            .collect();
        if names.is_empty() {
            return Reply::text(NO_CURRENT_METRICS);
        }

        let mut values: Vec<String> = names
            .iter()
            .map(|name| {
                state
                    .steps()
                    .target_state_metrics
                    .iter()
                    .find(|target| &target.metric == name)
                    .map(|target| target.target_value.clone())
                    .unwrap_or_default()
            })
            .collect();
        parse_metric_values(input, &names, &mut values);
        state.steps_mut().target_state_metrics = names
            .iter()
            .zip(values.iter())
            .map(|(metric, value)| TargetMetric {
                metric: metric.clone(),
                target_value: value.trim().to_string(),
            })
            .collect();

        if values.iter().any(|value| value.trim().is_empty()) {
            return Reply::text(step5_prompt(&names));
        }

        state.current_step = Step::RootCauses;
        state.meta.step6_phase = Step6Phase::SelectProblem;
        let raw = state.steps().raw_problem_text().to_string();
        let pool = refresh_problem_pool(ctx, state, &raw);
        let steps = state.steps_mut();
        steps.step6_pending_problems.clear();
        steps.step6_active_problem.clear();
        steps.step6_why_chain.clear();

        Reply::text(format!(
            "✅ Шаг 5 завершён.\n\nЗафиксированы целевые значения метрик.\n\n\
             🧩 Шаг 6: Анализ коренных причин (5 Почему)\n\n\
             Выбери проблему для анализа (одну за раз) или напиши свою.\n\n\
             {}{PROBLEMS_TEMPLATE}\n{REGEN_LINE}\n\n",
            problem_pool(&pool)
        ))
        .regenerable()
    }
}
