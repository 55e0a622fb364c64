use super::{StepHandler, TurnContext};
use crate::extract::{
    choice_numbers, is_numeric_pick, parse_actions_template, parse_plan_items, pick_by_numbers,
};
use crate::intent::{is_confirmation, is_regen_command};
use crate::orchestrator::render::{countermeasure_prompt, plan_prompt, step_intro, step_not_configured};
use crate::orchestrator::{Reply, CONFIRM_SUGGESTION};
use crate::plan::{self, plan_warnings, PlanError};
use crate::provider::TextGenerator;
use crate::store::{ProjectState, Step, Step7Phase};

const ACTION_PICK_LIMIT: usize = 5;
const NO_ROOTS: &str = "⚠️ Сначала нужно зафиксировать корневые причины на шаге 6.\n\n";
const NO_SUGGESTIONS: &str = "⚠️ Не удалось получить варианты контрмер от LLM. \
Проверь модель методолога или попробуй снова: `обнови варианты`.\n\n";
const NEXT_ROOT: &str = "✅ Контрмеры зафиксированы. Переходим к следующей причине.\n\n";
const NO_ACTIONS: &str = "⚠️ Нет выбранных контрмер. Давай выберем их заново.\n\n\
Напиши: `обнови варианты`.\n\n";
const PLAN_UPDATED: &str = "✅ План обновлён. Если всё ок, напиши: `ок`.\n\n";
const STEP7_DONE: &str = "✅ Шаг 7 завершён.\n\nПлан улучшений зафиксирован.\n\n";

/// Step 7: countermeasures per root cause, then the improvement plan.
pub struct CountermeasuresStep;

fn fetch_suggestions<G: TextGenerator>(
    ctx: &TurnContext<'_, G>,
    state: &mut ProjectState,
    root: &str,
) -> Vec<String> {
    let generated = ctx.proposals.countermeasures(root, state.steps());
    let steps = state.steps_mut();
    steps
        .step7_suggestions_by_root
        .insert(root.to_string(), generated.actions.clone());
    steps.step7_llm_raw = generated.llm_raw;
    steps.step7_llm_error = generated.llm_error;
    generated.actions
}

fn plan_reply(prefix: &str, state: &ProjectState) -> Reply {
    let items = &state.steps().step7_plan;
    Reply::text(plan_prompt(prefix, items, &plan_warnings(items))).with_suggestion(CONFIRM_SUGGESTION)
}

impl CountermeasuresStep {
    fn countermeasures<G: TextGenerator>(
        &self,
        ctx: &TurnContext<'_, G>,
        state: &mut ProjectState,
        input: &str,
    ) -> Reply {
        let roots = state.steps().root_cause_texts();
        if roots.is_empty() {
            return Reply::text(NO_ROOTS);
        }
        {
            let steps = state.steps_mut();
            if steps.step7_active_root_cause.trim().is_empty() {
                if steps.step7_pending_root_causes.is_empty() {
                    steps.step7_pending_root_causes = roots;
                }
                steps.step7_active_root_cause = steps.step7_pending_root_causes.remove(0);
            }
        }
        let active = state.steps().step7_active_root_cause.clone();

        let regen = is_regen_command(input);
        let cached = state.steps().step7_suggestions_by_root.get(&active).cloned();
        let suggestions = match cached {
            Some(actions) if !regen => actions,
            _ => fetch_suggestions(ctx, state, &active),
        };

        if regen || input.trim().is_empty() {
            let prompt = countermeasure_prompt("", regen, &active, &suggestions);
            let text = if suggestions.is_empty() {
                format!("{NO_SUGGESTIONS}{prompt}")
            } else {
                prompt
            };
            return Reply::text(text).regenerable();
        }

        let mut selected = parse_actions_template(input);
        if selected.is_empty() && is_numeric_pick(input) {
            selected = pick_by_numbers(&suggestions, &choice_numbers(input, ACTION_PICK_LIMIT));
        }
        if selected.is_empty() {
            return Reply::text(countermeasure_prompt("", false, &active, &suggestions))
                .regenerable();
        }

        plan::record_countermeasure(state.steps_mut(), &active, selected);

        if !state.steps().step7_pending_root_causes.is_empty() {
            let next = state.steps_mut().step7_pending_root_causes.remove(0);
            state.steps_mut().step7_active_root_cause = next.clone();
            let cached = state.steps().step7_suggestions_by_root.get(&next).cloned();
            let suggestions = match cached {
                Some(actions) => actions,
                None => fetch_suggestions(ctx, state, &next),
            };
            return Reply::text(countermeasure_prompt(NEXT_ROOT, false, &next, &suggestions))
                .regenerable();
        }

        state.meta.step7_phase = Step7Phase::Plan;
        self.ensure_plan(ctx, state);
        plan_reply("", state)
    }

    fn ensure_plan<G: TextGenerator>(&self, ctx: &TurnContext<'_, G>, state: &mut ProjectState) {
        if !state.steps().step7_plan.is_empty() {
            return;
        }
        let steps = state.steps();
        let items = ctx
            .proposals
            .plan(&steps.step7_selected_actions, &steps.process_context)
            .unwrap_or_default();
        state.steps_mut().step7_plan = items;
    }

    fn plan<G: TextGenerator>(
        &self,
        ctx: &TurnContext<'_, G>,
        state: &mut ProjectState,
        input: &str,
    ) -> Reply {
        if state.steps().step7_selected_actions.is_empty() {
            state.meta.step7_phase = Step7Phase::Countermeasures;
            return Reply::text(NO_ACTIONS).regenerable();
        }
        self.ensure_plan(ctx, state);

        if is_confirmation(input) {
            return match plan::check_confirmation(&state.steps().step7_plan) {
                Ok(()) => {
                    state.meta.step7_phase = Step7Phase::Done;
                    state.current_step = Step::Complete;
                    match ctx.descriptor(8) {
                        Some(descriptor) => Reply::text(format!(
                            "{STEP7_DONE}{}",
                            step_intro(&descriptor, "➡️")
                        )),
                        None => Reply::text(step_not_configured(STEP7_DONE, 8)),
                    }
                }
                Err(PlanError::Empty) => plan_reply(&format!("{}\n\n", PlanError::Empty), state),
                Err(_) => plan_reply("", state),
            };
        }

        let items = parse_plan_items(input);
        if items.is_empty() {
            return plan_reply("", state);
        }
        match plan::replace_plan(state.steps_mut(), items) {
            Ok(()) => plan_reply(PLAN_UPDATED, state),
            Err(err) => Reply::text(format!("{err}\n\n")),
        }
    }
}

impl<G: TextGenerator> StepHandler<G> for CountermeasuresStep {
    fn handle(&self, ctx: &TurnContext<'_, G>, state: &mut ProjectState, input: &str) -> Reply {
        match state.meta.step7_phase {
            Step7Phase::Plan => self.plan(ctx, state, input),
            Step7Phase::Countermeasures | Step7Phase::Done => {
                self.countermeasures(ctx, state, input)
            }
        }
    }
}
