//! Turn handling: resolve the user's project, run a global command or the
//! current step's handler, persist once, reply.

pub mod commands;
pub mod edit;
pub mod error;
pub mod render;
pub mod steps;

pub use error::OrchestratorError;
pub use steps::{StepHandler, TurnContext};

use crate::catalog::StepCatalog;
use crate::config::Settings;
use crate::intent::parse_command;
use crate::proposals::Proposals;
use crate::provider::{ModelRunner, TextGenerator};
use crate::runtime::{append_runtime_log, StatePaths};
use crate::shared::ids::UserId;
use crate::shared::text::strip_invisible;
use crate::store::{ActiveProjectStore, ProjectStore, Step};

pub const REGEN_SUGGESTION: &str = "🔁 ОБНОВИТЬ ВАРИАНТЫ";
pub const FIX_ROOT_SUGGESTION: &str = "зафиксировать как корневую";
pub const CONFIRM_SUGGESTION: &str = "ок";

/// Reply text plus optional quick-reply suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reply {
    pub text: String,
    pub suggestions: Vec<String>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        if !self.suggestions.iter().any(|s| s == suggestion) {
            self.suggestions.push(suggestion.to_string());
        }
        self
    }

    /// The reply lists variants that `обнови варианты` can refresh.
    pub fn regenerable(self) -> Self {
        self.with_suggestion(REGEN_SUGGESTION)
    }
}

pub struct Orchestrator<G> {
    paths: StatePaths,
    projects: ProjectStore,
    active: ActiveProjectStore,
    catalog: StepCatalog,
    proposals: Proposals<G>,
}

impl<G: TextGenerator> Orchestrator<G> {
    pub fn new(settings: &Settings, generator: G) -> Self {
        let paths = settings.state_paths();
        let runner = ModelRunner::new(
            generator,
            &settings.methodologist_model,
            &settings.review_model,
        )
        .with_log_paths(paths.clone());
        Self::with_parts(paths, &settings.default_project_id, Proposals::new(runner))
    }

    pub fn with_parts(paths: StatePaths, default_project_id: &str, proposals: Proposals<G>) -> Self {
        Self {
            projects: ProjectStore::new(paths.clone()),
            active: ActiveProjectStore::new(paths.clone(), default_project_id),
            catalog: StepCatalog::new(paths.clone()),
            paths,
            proposals,
        }
    }

    pub fn projects(&self) -> &ProjectStore {
        &self.projects
    }

    pub fn active(&self) -> &ActiveProjectStore {
        &self.active
    }

    pub fn catalog(&self) -> &StepCatalog {
        &self.catalog
    }

    pub fn proposals(&self) -> &Proposals<G> {
        &self.proposals
    }

    fn turn_context(&self) -> TurnContext<'_, G> {
        TurnContext {
            catalog: &self.catalog,
            proposals: &self.proposals,
        }
    }

    /// One inbound message, one reply. Only a failed state write is an error.
    pub fn handle_turn(&self, user_id: &str, text: &str) -> Result<Reply, OrchestratorError> {
        let user = UserId::parse(user_id).map_err(OrchestratorError::InvalidUser)?;
        let user_id = user.as_str();
        let text = strip_invisible(text).trim().to_string();
        let project_id = self.active.get(user_id);
        append_runtime_log(
            &self.paths,
            "info",
            "turn.received",
            &format!(
                "user={user_id} project={project_id} chars={}",
                text.chars().count()
            ),
        );

        if let Some(command) = parse_command(&text) {
            append_runtime_log(
                &self.paths,
                "info",
                "turn.command",
                &format!("user={user_id} command={command:?}"),
            );
            return commands::run(self, user_id, &project_id, command);
        }

        let mut state = self.projects.load(&project_id);

        if state.meta.edit_mode {
            let reply = edit::handle_edit_turn(&mut state, &text)?;
            self.projects.save(&mut state)?;
            return Ok(Reply::text(reply));
        }

        if text.is_empty() && state.current_step != Step::RootCauses {
            let step = state.current_step.number();
            let reply = match self.catalog.get(step) {
                Some(descriptor) => render::instruction_reminder(&descriptor),
                None => render::missing_descriptor(step),
            };
            return Ok(Reply::text(reply));
        }

        state.record_raw(&text);
        let reply = steps::dispatch(&self.turn_context(), &mut state, &text);
        self.projects.save(&mut state)?;
        Ok(reply)
    }
}
