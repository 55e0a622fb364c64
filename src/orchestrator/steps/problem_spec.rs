use super::{StepHandler, TurnContext};
use crate::extract::problem_spec_from_template;
use crate::gate::{looks_like_later_step_template, problem_spec_strength};
use crate::intent::is_regen_command;
use crate::orchestrator::render::{
    hints_block, step3_entry, REGEN_LINE, STEP2_TEMPLATE, UPDATED_PREFIX,
};
use crate::orchestrator::Reply;
use crate::provider::TextGenerator;
use crate::store::{ProblemSpec, ProjectState, Step, Step3Phase};

const NOT_SPECIFIC: &str = "⚠️ Пока недостаточно конкретики, чтобы двигаться дальше.\n\n";
const STEP3_MISSING: &str = "✅ Шаг 2 готов.\n\n\
➡️ Дальше должен быть Шаг 3, но файл `step_3.json` пока не найден.\n\
Создай `step_3.json` в папке steps — и продолжим.\n\n";

/// Step 2: where/when, scale, consequences, who suffers, money.
pub struct ProblemSpecStep;

impl<G: TextGenerator> StepHandler<G> for ProblemSpecStep {
    fn handle(&self, ctx: &TurnContext<'_, G>, state: &mut ProjectState, input: &str) -> Reply {
        let raw = state.steps().raw_problem_text().to_string();

        if is_regen_command(input) {
            let proposal = ctx.proposals.step2(&raw, "");
            return Reply::text(format!(
                "{UPDATED_PREFIX}{STEP2_TEMPLATE}{}\n\n{REGEN_LINE}",
                hints_block(&proposal.hints)
            ))
            .regenerable();
        }

        // A filled template is taken as is. Text meant for a later step
        // changes nothing; only free text goes to the generated extraction.
        let proposal = ctx.proposals.step2(&raw, input);
        let templated = problem_spec_from_template(input);
        let incoming = if !templated.is_empty() {
            templated
        } else if looks_like_later_step_template(input) {
            ProblemSpec::default()
        } else {
            proposal.extracted
        };
        state.steps_mut().problem_spec.merge_from(&incoming);

        if !problem_spec_strength(&state.steps().problem_spec).passes() {
            return Reply::text(format!(
                "{NOT_SPECIFIC}{STEP2_TEMPLATE}{}",
                hints_block(&proposal.hints)
            ));
        }

        state.current_step = Step::Process;
        state.meta.step3_phase = Step3Phase::Context;

        let Some(descriptor) = ctx.descriptor(3) else {
            return Reply::text(STEP3_MISSING);
        };
        let spec = state.steps().problem_spec.clone();
        let step3 = ctx.proposals.step3_context(&raw, &spec, "");
        Reply::text(step3_entry(&descriptor, &step3)).regenerable()
    }
}
