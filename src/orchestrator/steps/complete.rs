use super::{StepHandler, TurnContext};
use crate::orchestrator::Reply;
use crate::provider::TextGenerator;
use crate::store::ProjectState;

/// Past the last implemented step: the message is kept, nothing advances.
pub struct CompleteStep;

impl<G: TextGenerator> StepHandler<G> for CompleteStep {
    fn handle(&self, _ctx: &TurnContext<'_, G>, state: &mut ProjectState, _input: &str) -> Reply {
        Reply::text(format!(
            "✅ Сохранено.\n\nТекущий шаг: {}\nДальше расширим логику под следующий шаг.\n\n",
            state.current_step
        ))
    }
}
