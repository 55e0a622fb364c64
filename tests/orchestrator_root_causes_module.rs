use a3coach::extract::POOL_MARKER;
use a3coach::orchestrator::render::UPDATED_PREFIX;
use a3coach::orchestrator::{Orchestrator, Reply, FIX_ROOT_SUGGESTION};
use a3coach::proposals::Proposals;
use a3coach::provider::{ModelRunner, OfflineGenerator};
use a3coach::runtime::{bootstrap_state_root, StatePaths};
use a3coach::store::{ProjectState, RootCause, Step, Step6Phase, Step7Phase, WhyEntry};
use a3coach::templates::install_default_step_catalog;
use tempfile::{tempdir, TempDir};

const USER: &str = "u1";
const RAW: &str = "Лимиты на технику согласовываются несвоевременно";

fn setup() -> (TempDir, Orchestrator<OfflineGenerator>) {
    let dir = tempdir().expect("tempdir");
    let paths = StatePaths::new(dir.path().join("state"));
    bootstrap_state_root(&paths).expect("bootstrap");
    install_default_step_catalog(&paths.steps_dir()).expect("step catalog");
    let runner = ModelRunner::new(OfflineGenerator, "gpt-5.2", "gpt-5.2")
        .with_log_paths(paths.clone());
    (
        dir,
        Orchestrator::with_parts(paths, "A3-0001", Proposals::new(runner)),
    )
}

fn turn(orchestrator: &Orchestrator<OfflineGenerator>, text: &str) -> Reply {
    orchestrator.handle_turn(USER, text).expect("turn succeeds")
}

fn state(orchestrator: &Orchestrator<OfflineGenerator>) -> ProjectState {
    orchestrator.projects().load("A3-0001")
}

/// A project sitting at the step-6 problem selection with a three-item pool.
fn seed_selection(orchestrator: &Orchestrator<OfflineGenerator>) {
    let mut seeded = ProjectState::skeleton("A3-0001");
    seeded.current_step = Step::RootCauses;
    seeded.meta.step6_phase = Step6Phase::SelectProblem;
    let steps = seeded.steps_mut();
    steps.raw_problem.raw_problem_sentence = RAW.to_string();
    steps.step6_problem_pool = vec![
        format!("{RAW}{POOL_MARKER}"),
        "Бригады ждут технику на объекте".to_string(),
        "Заявки возвращаются на доработку".to_string(),
    ];
    orchestrator.projects().save(&mut seeded).expect("seed state");
}

fn why_entry(level: u32, answer: &str) -> WhyEntry {
    WhyEntry {
        level,
        effect: RAW.to_string(),
        question: "Почему?".to_string(),
        answer: answer.to_string(),
        ..WhyEntry::default()
    }
}

#[test]
fn numeric_multi_select_queues_problems_without_the_pool_marker() {
    let (_dir, orchestrator) = setup();
    seed_selection(&orchestrator);

    let reply = turn(&orchestrator, "1, 2");
    assert!(reply.text.starts_with("✅ Проблемы зафиксированы."));
    assert!(!reply.suggestions.contains(&FIX_ROOT_SUGGESTION.to_string()));

    let saved = state(&orchestrator);
    assert_eq!(saved.meta.step6_phase, Step6Phase::WhyLoop);
    assert_eq!(saved.steps().step6_active_problem, RAW);
    assert_eq!(
        saved.steps().step6_pending_problems,
        ["Бригады ждут технику на объекте"]
    );
    assert_eq!(saved.steps().step6_selected_problems.len(), 2);
}

#[test]
fn problem_template_selects_custom_problems() {
    let (_dir, orchestrator) = setup();
    seed_selection(&orchestrator);

    turn(
        &orchestrator,
        "Проблемы:\n- Механики не видят заявки\n- Диспетчер перегружен",
    );
    let saved = state(&orchestrator);
    assert_eq!(saved.steps().step6_active_problem, "Механики не видят заявки");
    assert_eq!(saved.steps().step6_pending_problems, ["Диспетчер перегружен"]);
}

#[test]
fn free_text_becomes_a_single_custom_problem() {
    let (_dir, orchestrator) = setup();
    seed_selection(&orchestrator);

    turn(&orchestrator, "Проблема: техника приходит не та");
    let saved = state(&orchestrator);
    assert_eq!(saved.steps().step6_active_problem, "техника приходит не та");
    assert!(saved.steps().step6_pending_problems.is_empty());
}

#[test]
fn empty_message_at_selection_repeats_the_pool() {
    let (_dir, orchestrator) = setup();
    seed_selection(&orchestrator);

    let reply = turn(&orchestrator, "");
    assert!(reply.text.starts_with("🧩 Шаг 6: Анализ коренных причин"));
    assert!(reply.text.contains("- `Заявки возвращаются на доработку`"));
    assert_eq!(state(&orchestrator).meta.step6_phase, Step6Phase::SelectProblem);
}

#[test]
fn regen_and_pasted_problem_lists_do_not_extend_the_chain() {
    let (_dir, orchestrator) = setup();
    seed_selection(&orchestrator);
    turn(&orchestrator, "1");
    turn(&orchestrator, "Заявки подают в последний момент");

    let reply = turn(&orchestrator, "обнови варианты");
    assert!(reply.text.starts_with(UPDATED_PREFIX));
    assert!(reply.text.contains("*Почему 1: Заявки подают в последний момент*"));

    let reply = turn(&orchestrator, "Проблемы:\n- Одна\n- Другая");
    assert!(reply.text.contains("Почему?"));

    let saved = state(&orchestrator);
    assert_eq!(saved.steps().step6_why_chain.len(), 1);
    assert_eq!(saved.steps().step6_why_chain[0].level, 1);
    assert_eq!(saved.steps().step6_why_chain[0].effect, RAW);
    assert_eq!(saved.steps().step6_why_suggestions.len(), 5);
}

#[test]
fn fixing_without_an_answer_is_rejected() {
    let (_dir, orchestrator) = setup();
    seed_selection(&orchestrator);
    turn(&orchestrator, "1");

    let reply = turn(&orchestrator, "зафиксировать как корневую");
    assert_eq!(reply.text, "⚠️ Сначала нужно выбрать хотя бы один ответ.");
    assert!(state(&orchestrator).steps().root_causes.is_empty());
}

#[test]
fn fourth_root_cause_for_one_problem_is_rejected() {
    let (_dir, orchestrator) = setup();
    let mut seeded = ProjectState::skeleton("A3-0001");
    seeded.current_step = Step::RootCauses;
    seeded.meta.step6_phase = Step6Phase::WhyLoop;
    let steps = seeded.steps_mut();
    steps.raw_problem.raw_problem_sentence = RAW.to_string();
    steps.step6_active_problem = RAW.to_string();
    steps.step6_selected_problems = vec![RAW.to_string()];
    steps.step6_why_chain = vec![why_entry(1, "Нет графика подачи заявок")];
    steps.step6_why_suggestions = vec!["Причина".to_string()];
    steps.root_causes = (0..3)
        .map(|i| RootCause {
            problem: RAW.to_string(),
            root_cause: format!("Причина {i}"),
            linked_chain_level: 1,
            ..RootCause::default()
        })
        .collect();
    orchestrator.projects().save(&mut seeded).expect("seed state");

    let reply = turn(&orchestrator, "зафиксировать как корневую");
    assert_eq!(reply.text, "⚠️ Максимум 3 корневые причины на одну проблему.");
    let saved = state(&orchestrator);
    assert_eq!(saved.steps().root_causes.len(), 3);
    assert_eq!(saved.current_step, Step::RootCauses);
}

#[test]
fn two_problems_lead_to_countermeasures_for_each_root_cause() {
    let (_dir, orchestrator) = setup();
    seed_selection(&orchestrator);
    turn(&orchestrator, "1, 2");

    turn(&orchestrator, "Заявки подают в последний момент");
    let reply = turn(
        &orchestrator,
        "зафиксировать как корневую\nТип: процесс\nЧто изменить: ввести график подачи",
    );
    assert!(reply
        .text
        .starts_with("✅ Корневая причина зафиксирована. Переходим к следующей проблеме."));
    assert!(reply.text.contains("Проблема: Бригады ждут технику на объекте"));
    let saved = state(&orchestrator);
    assert_eq!(saved.steps().step6_active_problem, "Бригады ждут технику на объекте");
    assert!(saved.steps().step6_why_chain.is_empty());
    assert_eq!(saved.steps().root_causes[0].cause_type, "процесс");
    assert_eq!(saved.steps().root_causes[0].change_hint, "ввести график подачи");

    turn(&orchestrator, "Нет резерва техники");
    let reply = turn(&orchestrator, "зафиксировать как корневую");
    assert!(reply.text.starts_with("✅ Шаг 6 завершён."));
    assert!(reply
        .text
        .contains("Корневая причина: Заявки подают в последний момент"));
    let saved = state(&orchestrator);
    assert_eq!(saved.current_step, Step::Countermeasures);
    assert_eq!(saved.meta.step6_phase, Step6Phase::Done);
    assert_eq!(saved.steps().root_causes.len(), 2);
    assert_eq!(
        saved.steps().step7_pending_root_causes,
        ["Нет резерва техники"]
    );
    assert_eq!(
        saved.steps().step6_chains_by_problem.len(),
        2,
        "chain kept per problem"
    );

    let reply = turn(&orchestrator, "1");
    assert!(reply
        .text
        .starts_with("✅ Контрмеры зафиксированы. Переходим к следующей причине."));
    assert!(reply.text.contains("Корневая причина: Нет резерва техники"));

    let reply = turn(&orchestrator, "Контрмеры:\n- Создать резерв техники на участке");
    assert!(reply.text.contains("🧩 Шаг 7: План улучшений"));
    let saved = state(&orchestrator);
    assert_eq!(saved.meta.step7_phase, Step7Phase::Plan);
    assert_eq!(saved.steps().step7_countermeasures.len(), 2);
    assert_eq!(
        saved.steps().step7_selected_actions.last().map(String::as_str),
        Some("Создать резерв техники на участке")
    );
}

#[test]
fn unparsable_countermeasure_reply_repeats_the_prompt() {
    let (_dir, orchestrator) = setup();
    seed_selection(&orchestrator);
    turn(&orchestrator, "1");
    turn(&orchestrator, "Заявки подают в последний момент");
    turn(&orchestrator, "зафиксировать как корневую");

    let reply = turn(&orchestrator, "не знаю что выбрать");
    assert!(reply.text.starts_with("🧩 Шаг 7: Контрмеры по корневым причинам"));
    assert!(reply.text.contains("**Контрмеры (варианты):**"));
    let saved = state(&orchestrator);
    assert_eq!(saved.meta.step7_phase, Step7Phase::Countermeasures);
    assert!(saved.steps().step7_selected_actions.is_empty());
}
