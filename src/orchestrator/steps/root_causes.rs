use super::target_metrics::refresh_problem_pool;
use super::{StepHandler, TurnContext};
use crate::extract::{
    choice_numbers, clean_problem_text, extract_custom_problem, is_numeric_pick,
    looks_like_problem_list, parse_problems_template, pick_by_numbers, strip_pool_marker,
};
use crate::intent::{is_fix_root_command, is_regen_command};
use crate::orchestrator::render::{
    countermeasure_prompt, step6_select_prompt, step_not_configured, why_prompt, ACTIONS_TEMPLATE,
};
use crate::orchestrator::{Reply, FIX_ROOT_SUGGESTION};
use crate::provider::TextGenerator;
use crate::store::{ProjectState, Step, Step6Phase, Step7Phase};
use crate::whychain::{self, FixOutcome};
use std::collections::BTreeMap;

const PROBLEM_PICK_LIMIT: usize = 6;
const PROBLEMS_FIXED: &str = "✅ Проблемы зафиксированы. Начнем с первой.\n\n";
const NEXT_PROBLEM: &str =
    "✅ Корневая причина зафиксирована. Переходим к следующей проблеме.\n\n";
const STEP6_DONE: &str = "✅ Шаг 6 завершён.\n\nЗафиксированы корневые причины.\n\n";

/// Step 6: pick problems, then ask "why?" until root causes are fixed.
pub struct RootCausesStep;

fn why_reply(state: &ProjectState, prefix: &str, updated: bool) -> Reply {
    let steps = state.steps();
    let chain: Vec<(usize, String)> = whychain::visible_chain(steps)
        .into_iter()
        .map(|(index, entry)| (index, entry.answer.clone()))
        .collect();
    let text = why_prompt(
        prefix,
        updated,
        &steps.step6_active_problem,
        &chain,
        &steps.step6_why_suggestions,
    );
    let reply = Reply::text(text).regenerable();
    if steps.step6_why_chain.is_empty() {
        reply
    } else {
        reply.with_suggestion(FIX_ROOT_SUGGESTION)
    }
}

fn refresh_why_suggestions<G: TextGenerator>(
    ctx: &TurnContext<'_, G>,
    state: &mut ProjectState,
    effect: &str,
) {
    let why = ctx.proposals.why(effect);
    state.steps_mut().step6_why_suggestions = why.suggestions;
}

impl RootCausesStep {
    fn select<G: TextGenerator>(
        &self,
        ctx: &TurnContext<'_, G>,
        state: &mut ProjectState,
        input: &str,
    ) -> Reply {
        let regen = is_regen_command(input);
        if regen || state.steps().step6_problem_pool.is_empty() {
            let raw = clean_problem_text(state.steps().raw_problem_text());
            refresh_problem_pool(ctx, state, &raw);
        }
        let pool = state.steps().step6_problem_pool.clone();
        if regen || input.trim().is_empty() {
            return Reply::text(step6_select_prompt(&pool, regen)).regenerable();
        }

        let mut selected = parse_problems_template(input);
        if selected.is_empty() && is_numeric_pick(input) {
            selected = pick_by_numbers(&pool, &choice_numbers(input, PROBLEM_PICK_LIMIT));
        }
        if selected.is_empty() {
            let custom = extract_custom_problem(input);
            if !custom.is_empty() {
                selected.push(custom);
            }
        }
        let selected: Vec<String> = selected
            .iter()
            .map(|problem| strip_pool_marker(problem))
            .filter(|problem| !problem.is_empty())
            .collect();
        if selected.is_empty() {
            return Reply::text(step6_select_prompt(&pool, false)).regenerable();
        }

        whychain::select_problems(state.steps_mut(), selected);
        state.meta.step6_phase = Step6Phase::WhyLoop;
        let active = state.steps().step6_active_problem.clone();
        refresh_why_suggestions(ctx, state, &active);
        why_reply(state, PROBLEMS_FIXED, false)
    }

    fn why_loop<G: TextGenerator>(
        &self,
        ctx: &TurnContext<'_, G>,
        state: &mut ProjectState,
        input: &str,
    ) -> Reply {
        whychain::clean_chain(state.steps_mut());
        whychain::ensure_active_problem(state.steps_mut());

        if is_fix_root_command(input) {
            return self.fix_root(ctx, state, input);
        }

        let regen = is_regen_command(input);
        if regen || state.steps().step6_why_suggestions.is_empty() {
            let effect = state
                .steps()
                .step6_why_chain
                .last()
                .map(|entry| entry.answer.clone())
                .unwrap_or_else(|| state.steps().step6_active_problem.clone());
            refresh_why_suggestions(ctx, state, &effect);
        }
        if regen || input.trim().is_empty() {
            return why_reply(state, "", regen);
        }
        if !parse_problems_template(input).is_empty() || looks_like_problem_list(input) {
            return why_reply(state, "", false);
        }

        whychain::record_answer(state.steps_mut(), input);
        refresh_why_suggestions(ctx, state, input.trim());
        why_reply(state, "", false)
    }

    fn fix_root<G: TextGenerator>(
        &self,
        ctx: &TurnContext<'_, G>,
        state: &mut ProjectState,
        input: &str,
    ) -> Reply {
        match whychain::fix_root_cause(state.steps_mut(), input) {
            Err(err) => Reply::text(err.to_string()),
            Ok(FixOutcome::NextProblem(next)) => {
                refresh_why_suggestions(ctx, state, &next);
                why_reply(state, NEXT_PROBLEM, false)
            }
            Ok(FixOutcome::Finished) => self.finish(ctx, state),
        }
    }

    fn finish<G: TextGenerator>(&self, ctx: &TurnContext<'_, G>, state: &mut ProjectState) -> Reply {
        state.meta.step6_phase = Step6Phase::Done;
        state.current_step = Step::Countermeasures;
        state.meta.step7_phase = Step7Phase::Countermeasures;

        if ctx.descriptor(7).is_none() {
            return Reply::text(step_not_configured(STEP6_DONE, 7));
        }

        let roots = state.steps().root_cause_texts();
        let Some((active, pending)) = roots.split_first() else {
            return Reply::text(format!(
                "{STEP6_DONE}➡️ Шаг 7: Контрмеры по корневым причинам.\n\n{ACTIONS_TEMPLATE}\n"
            ));
        };

        let suggestions = ctx.proposals.countermeasures(active, state.steps());
        let steps = state.steps_mut();
        steps.step7_active_root_cause = active.clone();
        steps.step7_pending_root_causes = pending.to_vec();
        steps.step7_suggestions_by_root =
            BTreeMap::from([(active.clone(), suggestions.actions.clone())]);
        steps.step7_llm_raw = suggestions.llm_raw;
        steps.step7_llm_error = suggestions.llm_error;

        Reply::text(countermeasure_prompt(
            STEP6_DONE,
            false,
            active,
            &suggestions.actions,
        ))
        .regenerable()
    }
}

impl<G: TextGenerator> StepHandler<G> for RootCausesStep {
    fn handle(&self, ctx: &TurnContext<'_, G>, state: &mut ProjectState, input: &str) -> Reply {
        match state.meta.step6_phase {
            Step6Phase::WhyLoop => self.why_loop(ctx, state, input),
            Step6Phase::SelectProblem | Step6Phase::Done => self.select(ctx, state, input),
        }
    }
}
