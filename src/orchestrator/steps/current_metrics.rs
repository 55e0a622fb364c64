use super::{StepHandler, TurnContext};
use crate::extract::{
    choice_numbers, custom_metrics, dedupe_metrics, is_numeric_pick, parse_metric_values,
    parse_metrics_template, pick_by_numbers,
};
use crate::intent::is_regen_command;
use crate::orchestrator::render::{
    metric_values_prompt, step4_help, step5_prompt, METRICS_TEMPLATE, UPDATED_PREFIX,
    VALUES_LATER,
};
use crate::orchestrator::Reply;
use crate::provider::TextGenerator;
use crate::shared::text::backticked_bullets;
use crate::store::{CurrentMetric, ProjectState, Step, Step4Phase};

const REGEN_FAILED: &str = "⚠️ Не смог обновить варианты метрик.\n\
Попробуй ещё раз или напиши свои метрики в формате:\nМетрика: ...\n\n\
Значения запросим следующим сообщением.\n\n";
const REGEN_EMPTY: &str = "⚠️ Не удалось получить варианты метрик.\n\
Попробуй ещё раз или напиши свои метрики :\nМетрика: ...\n\n";
const FETCH_FAILED: &str = "⚠️ Не смог получить варианты метрик.\n\
Попробуй ещё раз или напиши свои метрики по шаблону:\n";
const NO_SUGGESTIONS: &str = "⚠️ Нет доступных вариантов метрик.\nНапиши свои метрики по шаблону:\n";
const TOO_FEW: &str = "⚠️ Нужно минимум 2 метрики текущего состояния.\n";
const TOO_MANY: &str = "⚠️ Нужны 2–5 метрик. Сейчас их больше 5.\nСократи список и отправь снова.\n\n";
const NOT_FOUND: &str = "⚠️ Не нашёл выбранные метрики. Давай выберем их заново.\n\
Напиши: `обнови варианты`.\n\n";
const VALUES_MISSING: &str = "⚠️ Нужны текущие значения для всех выбранных метрик.\n\n";
const METRIC_PICK_LIMIT: usize = 5;

/// Step 4: choose 2–5 current-state metrics, then give their values.
pub struct CurrentMetricsStep;

fn strip_template_intro(template: &str) -> &str {
    template
        .strip_prefix("Ответь одним сообщением по шаблону:\n")
        .unwrap_or(template)
}

impl CurrentMetricsStep {
    fn proposal<G: TextGenerator>(
        &self,
        ctx: &TurnContext<'_, G>,
        state: &mut ProjectState,
        input: &str,
    ) -> Reply {
        let raw = state.steps().raw_problem_text().to_string();
        let spec = state.steps().problem_spec.clone();
        let process_context = state.steps().process_context.clone();

        if is_regen_command(input) {
            return match ctx.proposals.step4_metrics(&raw, &spec, &process_context) {
                Err(_) => Reply::text(REGEN_FAILED),
                Ok(metrics) if metrics.is_empty() => Reply::text(REGEN_EMPTY),
                Ok(metrics) => {
                    let text = format!(
                        "{UPDATED_PREFIX}Метрики (варианты):\n{}\n\n{METRICS_TEMPLATE}\n{VALUES_LATER}\
                         Чтобы обновить метрики — напиши: `обнови варианты`.\n\n",
                        backticked_bullets(&metrics)
                    );
                    state
                        .steps_mut()
                        .current_state_metric_proposals
                        .metric_suggestions = metrics;
                    Reply::text(text).regenerable()
                }
            };
        }

        let suggestions = state
            .steps()
            .current_state_metric_proposals
            .metric_suggestions
            .clone();
        let mut chosen: Vec<CurrentMetric> = parse_metrics_template(input)
            .into_iter()
            .map(|metric| CurrentMetric {
                metric,
                current_value: String::new(),
            })
            .collect();
        if chosen.is_empty() && is_numeric_pick(input) {
            chosen = pick_by_numbers(&suggestions, &choice_numbers(input, METRIC_PICK_LIMIT))
                .into_iter()
                .map(|metric| CurrentMetric {
                    metric,
                    current_value: String::new(),
                })
                .collect();
        } else if chosen.is_empty() {
            chosen = custom_metrics(input);
        }
        let chosen = dedupe_metrics(chosen);

        if chosen.is_empty() {
            return self.help(ctx, state, suggestions);
        }
        if chosen.len() < 2 {
            return Reply::text(format!("{TOO_FEW}{METRICS_TEMPLATE}\n"));
        }
        if chosen.len() > METRIC_PICK_LIMIT {
            return Reply::text(TOO_MANY);
        }

        let names: Vec<String> = chosen.iter().map(|m| m.metric.clone()).collect();
        state.steps_mut().current_state_metrics = chosen;
        state.meta.step4_phase = Step4Phase::Values;
        Reply::text(metric_values_prompt(&names, "Текущее значение"))
    }

    fn help<G: TextGenerator>(
        &self,
        ctx: &TurnContext<'_, G>,
        state: &mut ProjectState,
        mut suggestions: Vec<String>,
    ) -> Reply {
        if suggestions.is_empty() {
            let raw = state.steps().raw_problem_text().to_string();
            let spec = state.steps().problem_spec.clone();
            let process_context = state.steps().process_context.clone();
            match ctx.proposals.step4_metrics(&raw, &spec, &process_context) {
                Err(_) => {
                    return Reply::text(format!(
                        "{FETCH_FAILED}{}\n{VALUES_LATER}",
                        strip_template_intro(METRICS_TEMPLATE)
                    ))
                }
                Ok(metrics) if metrics.is_empty() => {
                    return Reply::text(format!(
                        "{NO_SUGGESTIONS}{}\n",
                        strip_template_intro(METRICS_TEMPLATE)
                    ))
                }
                Ok(metrics) => suggestions = metrics,
            }
            state
                .steps_mut()
                .current_state_metric_proposals
                .metric_suggestions = suggestions.clone();
        }
        Reply::text(step4_help(&suggestions)).regenerable()
    }

    fn values(&self, state: &mut ProjectState, input: &str) -> Reply {
        let names: Vec<String> = state
            .steps()
            .current_state_metrics
            .iter()
            .map(|m| m.metric.clone())
            .collect();
        if names.is_empty() {
            state.meta.step4_phase = Step4Phase::Proposal;
            return Reply::text(NOT_FOUND).regenerable();
        }

        let mut values: Vec<String> = state
            .steps()
            .current_state_metrics
            .iter()
            .map(|m| m.current_value.clone())
            .collect();
        parse_metric_values(input, &names, &mut values);
        for (metric, value) in state
            .steps_mut()
            .current_state_metrics
            .iter_mut()
            .zip(values.iter())
        {
            metric.current_value = value.trim().to_string();
        }

        if values.iter().any(|value| value.trim().is_empty()) {
            return Reply::text(format!(
                "{VALUES_MISSING}{}",
                metric_values_prompt(&names, "Текущее значение")
            ));
        }

        state.meta.step4_phase = Step4Phase::Done;
        state.current_step = Step::TargetMetrics;
        Reply::text(format!(
            "✅ Шаг 4 завершён.\n\nЗафиксированы метрики текущего состояния.\n\n{}",
            step5_prompt(&names)
        ))
    }
}

impl<G: TextGenerator> StepHandler<G> for CurrentMetricsStep {
    fn handle(&self, ctx: &TurnContext<'_, G>, state: &mut ProjectState, input: &str) -> Reply {
        match state.meta.step4_phase {
            Step4Phase::Values => self.values(state, input),
            Step4Phase::Proposal | Step4Phase::Done => self.proposal(ctx, state, input),
        }
    }
}
