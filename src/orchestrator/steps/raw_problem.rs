use super::{StepHandler, TurnContext};
use crate::gate::{contains_solution_language, looks_like_one_sentence};
use crate::orchestrator::render::{step2_prompt, step_not_configured};
use crate::orchestrator::Reply;
use crate::provider::TextGenerator;
use crate::store::{ProjectState, Step};

const NOT_ONE_SENTENCE: &str = "⚠️ На шаге 1 нужна одна простая фраза.\n\n\
Напиши проблему одним предложением (симптом), без причин и без решений.\n\
Пример: «Лимиты на использование машин и механизмов согласовываются несвоевременно».\n\n";

const SOLUTION_IN_PROBLEM: &str = "⚠️ На шаге 1 фиксируем только симптом, без решений.\n\n\
Переформулируй одним предложением без слов «автоматизировать/оптимизировать/внедрить/улучшить…».\n\
Пример: «…согласовывается несвоевременно / часто задерживается / не выполняется в срок».\n\n";

/// Step 1: one symptom sentence, no causes or solutions.
pub struct RawProblemStep;

impl<G: TextGenerator> StepHandler<G> for RawProblemStep {
    fn handle(&self, ctx: &TurnContext<'_, G>, state: &mut ProjectState, input: &str) -> Reply {
        if !looks_like_one_sentence(input) {
            return Reply::text(NOT_ONE_SENTENCE);
        }
        if contains_solution_language(input) {
            return Reply::text(SOLUTION_IN_PROBLEM);
        }

        let raw = input.trim().to_string();
        state.steps_mut().raw_problem.raw_problem_sentence = raw.clone();
        state.current_step = Step::ProblemSpec;

        let Some(descriptor) = ctx.descriptor(2) else {
            return Reply::text(step_not_configured("✅ Шаг 1 готов.\n\n", 2));
        };
        let proposal = ctx.proposals.step2(&raw, "");
        Reply::text(step2_prompt(&descriptor, &proposal.hints))
    }
}
