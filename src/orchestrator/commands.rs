//! Global commands. They bypass the step machine and never advance a step.

use super::{edit, Orchestrator, OrchestratorError, Reply};
use crate::catalog::StepDescriptor;
use crate::intent::Command;
use crate::provider::TextGenerator;
use crate::shared::ids::ProjectId;
use crate::store::ProjectState;
use crate::summary::{
    hypothesis_process_text, hypothesis_spec_text, render_hypothesis, summary_lines,
};

const REVIEW_COMMAND_LINE: &str = "Команда: `анализ проекта`";

pub fn run<G: TextGenerator>(
    orchestrator: &Orchestrator<G>,
    user_id: &str,
    project_id: &str,
    command: Command,
) -> Result<Reply, OrchestratorError> {
    match command {
        Command::Projects => projects(orchestrator),
        Command::StartNew => start_new(orchestrator, user_id),
        Command::Continue(None) => Ok(Reply::text("❗Укажи ID проекта: `/continue X-001`")),
        Command::Continue(Some(id)) => continue_project(orchestrator, user_id, &id),
        Command::Summary => {
            let state = orchestrator.projects().load(project_id);
            let mut lines = summary_lines(&state);
            lines.push(REVIEW_COMMAND_LINE.to_string());
            lines.push(String::new());
            Ok(Reply::text(lines.join("\n")))
        }
        Command::Review => Ok(review(orchestrator, project_id)),
        Command::Hypothesis => Ok(hypothesis(orchestrator, project_id)),
        Command::Edit => {
            let mut state = orchestrator.projects().load(project_id);
            state.meta.edit_mode = true;
            orchestrator.projects().save(&mut state)?;
            Ok(Reply::text(edit::edit_view(&state)?))
        }
    }
}

fn first_step(orchestrator: &Orchestrator<impl TextGenerator>) -> StepDescriptor {
    orchestrator.catalog().get(1).unwrap_or_default()
}

fn projects<G: TextGenerator>(orchestrator: &Orchestrator<G>) -> Result<Reply, OrchestratorError> {
    let projects = orchestrator.projects().list()?;
    if projects.is_empty() {
        return Ok(Reply::text("📂 Пока нет проектов."));
    }
    let lines = projects
        .iter()
        .map(|id| format!("- {id}"))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(Reply::text(format!("📂 Проекты:\n{lines}")))
}

fn start_new<G: TextGenerator>(
    orchestrator: &Orchestrator<G>,
    user_id: &str,
) -> Result<Reply, OrchestratorError> {
    let project_id = orchestrator.projects().next_project_id()?;
    let mut state = ProjectState::skeleton(&project_id);
    orchestrator.projects().save(&mut state)?;
    orchestrator.active().set(user_id, &project_id)?;
    let step1 = first_step(orchestrator);
    Ok(Reply::text(format!(
        "🆕 Создан новый проект: {project_id}\n\n📌 Шаг 1: {}\n\n{}\n\n",
        step1.title, step1.instruction
    )))
}

fn continue_project<G: TextGenerator>(
    orchestrator: &Orchestrator<G>,
    user_id: &str,
    raw_id: &str,
) -> Result<Reply, OrchestratorError> {
    let Ok(project_id) = ProjectId::parse(raw_id) else {
        return Ok(Reply::text(format!(
            "❗Некорректный ID проекта: `{raw_id}`. Используй латиницу, цифры, `-` и `_`."
        )));
    };
    let project_id = project_id.as_str();
    orchestrator.active().set(user_id, project_id)?;
    if !orchestrator.projects().exists(project_id) {
        let mut state = ProjectState::skeleton(project_id);
        orchestrator.projects().save(&mut state)?;
    }
    let step1 = first_step(orchestrator);
    Ok(Reply::text(format!(
        "🆕 Активный проект: {project_id}\n\n📌 Шаг 1: {}\n\n{}\n\n",
        step1.title, step1.instruction
    )))
}

fn review<G: TextGenerator>(orchestrator: &Orchestrator<G>, project_id: &str) -> Reply {
    let state = orchestrator.projects().load(project_id);
    let summary = summary_lines(&state).join("\n");
    match orchestrator.proposals().review(&summary) {
        Ok(review) => Reply::text(format!(
            "🧠 Анализ проекта :\n\n{}\n\n{REVIEW_COMMAND_LINE}",
            review.trim()
        )),
        Err(err) => Reply::text(format!(
            "⚠️ Не удалось выполнить анализ проекта через `{}`.\n\
             Причина: {err}\n\n\
             Проверь доступность модели и повтори команду `анализ проекта`.\n\n",
            orchestrator.proposals().runner().review_model()
        )),
    }
}

fn hypothesis<G: TextGenerator>(orchestrator: &Orchestrator<G>, project_id: &str) -> Reply {
    let state = orchestrator.projects().load(project_id);
    let steps = state.steps();
    let raw = steps.raw_problem_text();
    if raw.is_empty() {
        return Reply::text(
            "⚠️ Сначала опиши проблему на шаге 1 — тогда смогу сгенерировать гипотезу.",
        );
    }
    match orchestrator.proposals().hypothesis(
        raw,
        &hypothesis_spec_text(steps),
        &hypothesis_process_text(steps),
    ) {
        Ok(data) => Reply::text(render_hypothesis(&data)),
        Err(err) => Reply::text(format!("⚠️ Не удалось сгенерировать гипотезу: {err}")),
    }
}
