use super::{StepHandler, TurnContext};
use crate::extract::{choice_pair, process_context_from_template};
use crate::gate::{looks_like_step3_template, step3_context_missing};
use crate::intent::is_regen_command;
use crate::orchestrator::render::{
    metric_variants, naming_lists, naming_prompt, step3_missing, step_intro,
    step_not_configured, METRICS_TEMPLATE, REGEN_LINE, STEP3_NAMING_TEMPLATE, UPDATED_PREFIX,
    VALUES_LATER,
};
use crate::orchestrator::Reply;
use crate::provider::TextGenerator;
use crate::shared::text::labelled_value;
use crate::store::{ProcessDefinition, ProcessProposals, ProjectState, Step, Step3Phase, Step4Phase};

const CONTEXT_FIXED: &str = "✅ Контекст процесса зафиксирован.\n\n\
Теперь выбери, как назвать процесс и проект (можно выбрать или написать своё).\n\n";
const NO_CHOICE: &str = "⚠️ Не вижу выбор.\n\n";

fn human_missing(field: &str) -> &'static str {
    match field {
        "start_event" => "Событие начала",
        "end_event" => "Событие окончания",
        "owner" => "Владелец процесса",
        "perimeter" => "Периметр",
        _ => "Метрики результата (минимум 2)",
    }
}

/// Process and project names from labelled lines, or a `2 B` style pick.
fn naming_choice(input: &str, proposals: &ProcessProposals) -> (String, String) {
    let mut process = String::new();
    let mut project = String::new();
    for line in input.lines().map(str::trim) {
        if let Some(value) = labelled_value(line, "процесс") {
            process = value.trim_matches('`').trim().to_string();
        } else if let Some(value) = labelled_value(line, "название проекта")
            .or_else(|| labelled_value(line, "проект"))
        {
            project = value.trim_matches('`').trim().to_string();
        }
    }
    if process.is_empty() && project.is_empty() {
        if let Some((number, letter)) = choice_pair(input) {
            let project_index = (letter as u8 - b'A') as usize;
            if let (Some(p), Some(t)) = (
                proposals.process_variants.get(number - 1),
                proposals.project_variants.get(project_index),
            ) {
                process = p.clone();
                project = t.clone();
            }
        }
    }
    (process, project)
}

/// Step 3: process boundaries and metrics, then process and project names.
pub struct ProcessStep;

impl ProcessStep {
    fn context<G: TextGenerator>(
        &self,
        ctx: &TurnContext<'_, G>,
        state: &mut ProjectState,
        input: &str,
    ) -> Reply {
        let raw = state.steps().raw_problem_text().to_string();
        let spec = state.steps().problem_spec.clone();
        let regen = is_regen_command(input);
        let user_text = if regen { "" } else { input };
        let generated = ctx.proposals.step3_context(&raw, &spec, user_text);

        if !regen && looks_like_step3_template(input) {
            let mut incoming = process_context_from_template(input);
            if incoming.is_empty() {
                incoming = generated.extracted.clone();
            }
            state.steps_mut().process_context.merge_from(&incoming);
        }

        let missing = step3_context_missing(&state.steps().process_context);
        if missing.is_empty() {
            let process_context = state.steps().process_context.clone();
            let naming = ctx.proposals.step3_naming(&raw, &spec, &process_context);
            let text = format!("{CONTEXT_FIXED}{}", naming_prompt(&naming));
            state.steps_mut().process_proposals = naming;
            state.meta.step3_phase = Step3Phase::Proposal;
            return Reply::text(text).regenerable();
        }

        let human: Vec<&str> = missing.iter().map(|field| human_missing(field)).collect();
        let descriptor = ctx.descriptor(3);
        Reply::text(step3_missing(descriptor.as_ref(), &human, &generated)).regenerable()
    }

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
            let naming = ctx.proposals.step3_naming(&raw, &spec, &process_context);
            let text = format!(
                "{UPDATED_PREFIX}{}{STEP3_NAMING_TEMPLATE}",
                naming_lists(&naming)
            );
            state.steps_mut().process_proposals = naming;
            return Reply::text(text).regenerable();
        }

        if state.steps().process_proposals.is_empty() {
            state.steps_mut().process_proposals =
                ctx.proposals.step3_naming(&raw, &spec, &process_context);
        }
        let proposals = state.steps().process_proposals.clone();

        let only_digits = input.chars().all(|ch| ch.is_ascii_digit() || ch.is_whitespace());
        let (process, project) = if only_digits {
            (String::new(), String::new())
        } else {
            naming_choice(input, &proposals)
        };
        if process.is_empty() || project.is_empty() {
            return Reply::text(format!(
                "{NO_CHOICE}{}{STEP3_NAMING_TEMPLATE}{REGEN_LINE}\n\n",
                naming_lists(&proposals)
            ))
            .regenerable();
        }

        state.steps_mut().process_definition = ProcessDefinition {
            process_name: process.clone(),
            project_title: project.clone(),
            notes: "custom".to_string(),
        };
        state.meta.step3_phase = Step3Phase::Done;
        state.current_step = Step::CurrentMetrics;
        state.meta.step4_phase = Step4Phase::Proposal;

        let done = format!(
            "✅ Шаг 3 завершён.\n\nВыбрали процесс: {process}\nНазвание проекта: {project}\n\n"
        );
        let Some(descriptor) = ctx.descriptor(4) else {
            return Reply::text(step_not_configured(&done, 4));
        };

        let metrics = ctx
            .proposals
            .step4_metrics(&raw, &spec, &process_context)
            .unwrap_or_default();
        state
            .steps_mut()
            .current_state_metric_proposals
            .metric_suggestions = metrics.clone();

        let mut text = format!("{done}{}{METRICS_TEMPLATE}", step_intro(&descriptor, "➡️"));
        if !metrics.is_empty() {
            text.push_str("\n\n");
            text.push_str(&metric_variants(&metrics));
        }
        text.push_str("\n\n");
        text.push_str(VALUES_LATER);
        Reply::text(text).regenerable()
    }
}

impl<G: TextGenerator> StepHandler<G> for ProcessStep {
    fn handle(&self, ctx: &TurnContext<'_, G>, state: &mut ProjectState, input: &str) -> Reply {
        match state.meta.step3_phase {
            Step3Phase::Proposal => self.proposal(ctx, state, input),
            // A finished step 3 with current_step still at 3 restarts the context check.
            Step3Phase::Context | Step3Phase::Done => self.context(ctx, state, input),
        }
    }
}
