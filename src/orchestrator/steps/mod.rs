//! One handler per methodology step. Handlers mutate the loaded state and
//! return the reply; persistence stays with the orchestrator.

mod complete;
mod countermeasures;
mod current_metrics;
mod problem_spec;
mod process;
mod raw_problem;
mod root_causes;
mod target_metrics;

pub use complete::CompleteStep;
pub use countermeasures::CountermeasuresStep;
pub use current_metrics::CurrentMetricsStep;
pub use problem_spec::ProblemSpecStep;
pub use process::ProcessStep;
pub use raw_problem::RawProblemStep;
pub use root_causes::RootCausesStep;
pub use target_metrics::TargetMetricsStep;

use super::Reply;
use crate::catalog::{StepCatalog, StepDescriptor};
use crate::proposals::Proposals;
use crate::provider::TextGenerator;
use crate::store::{ProjectState, Step};

/// Collaborators a handler may consult during one turn.
pub struct TurnContext<'a, G> {
    pub catalog: &'a StepCatalog,
    pub proposals: &'a Proposals<G>,
}

impl<G> TurnContext<'_, G> {
    pub fn descriptor(&self, step: u32) -> Option<StepDescriptor> {
        self.catalog.get(step)
    }
}

pub trait StepHandler<G: TextGenerator> {
    fn handle(&self, ctx: &TurnContext<'_, G>, state: &mut ProjectState, input: &str) -> Reply;
}

pub fn dispatch<G: TextGenerator>(
    ctx: &TurnContext<'_, G>,
    state: &mut ProjectState,
    input: &str,
) -> Reply {
    match state.current_step {
        Step::RawProblem => RawProblemStep.handle(ctx, state, input),
        Step::ProblemSpec => ProblemSpecStep.handle(ctx, state, input),
        Step::Process => ProcessStep.handle(ctx, state, input),
        Step::CurrentMetrics => CurrentMetricsStep.handle(ctx, state, input),
        Step::TargetMetrics => TargetMetricsStep.handle(ctx, state, input),
        Step::RootCauses => RootCausesStep.handle(ctx, state, input),
        Step::Countermeasures => CountermeasuresStep.handle(ctx, state, input),
        Step::Complete => CompleteStep.handle(ctx, state, input),
    }
}
