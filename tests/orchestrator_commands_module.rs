use a3coach::orchestrator::{Orchestrator, OrchestratorError, Reply};
use a3coach::proposals::Proposals;
use a3coach::provider::{ModelRunner, OfflineGenerator};
use a3coach::runtime::{bootstrap_state_root, StatePaths};
use a3coach::store::Step;
use a3coach::templates::install_default_step_catalog;
use std::fs;
use tempfile::{tempdir, TempDir};

const RAW: &str = "Лимиты на технику согласовываются несвоевременно";

fn setup() -> (TempDir, StatePaths, Orchestrator<OfflineGenerator>) {
    let dir = tempdir().expect("tempdir");
    let paths = StatePaths::new(dir.path().join("state"));
    bootstrap_state_root(&paths).expect("bootstrap");
    install_default_step_catalog(&paths.steps_dir()).expect("step catalog");
    let runner = ModelRunner::new(OfflineGenerator, "gpt-5.2", "gpt-5.2")
        .with_log_paths(paths.clone());
    let orchestrator = Orchestrator::with_parts(paths.clone(), "A3-0001", Proposals::new(runner));
    (dir, paths, orchestrator)
}

fn turn(orchestrator: &Orchestrator<OfflineGenerator>, user: &str, text: &str) -> Reply {
    orchestrator.handle_turn(user, text).expect("turn succeeds")
}

#[test]
fn projects_lists_stored_ids() {
    let (_dir, _paths, orchestrator) = setup();
    assert_eq!(turn(&orchestrator, "u1", "/projects").text, "📂 Пока нет проектов.");

    turn(&orchestrator, "u1", RAW);
    let reply = turn(&orchestrator, "u1", "/projects");
    assert_eq!(reply.text, "📂 Проекты:\n- A3-0001");
}

#[test]
fn startnew_numbers_after_the_highest_trailing_digits() {
    let (_dir, _paths, orchestrator) = setup();
    turn(&orchestrator, "u1", RAW);

    let reply = turn(&orchestrator, "u1", "/startnew");
    assert!(reply.text.starts_with("🆕 Создан новый проект: 00002"));
    assert!(reply.text.contains("📌 Шаг 1: Сырая проблема"));
    assert_eq!(orchestrator.active().get("u1"), "00002");
    assert_eq!(orchestrator.active().get("u2"), "A3-0001");

    let reply = turn(&orchestrator, "u1", "/создать проект");
    assert!(reply.text.starts_with("🆕 Создан новый проект: 00003"));

    let fresh = orchestrator.projects().load("00003");
    assert_eq!(fresh.current_step, Step::RawProblem);
    assert!(fresh.created_at > 0);
}

#[test]
fn continue_switches_and_validates_the_id() {
    let (_dir, _paths, orchestrator) = setup();

    let reply = turn(&orchestrator, "u1", "/continue");
    assert_eq!(reply.text, "❗Укажи ID проекта: `/continue X-001`");

    let reply = turn(&orchestrator, "u1", "/continue ../etc");
    assert!(reply.text.starts_with("❗Некорректный ID проекта"));
    assert_eq!(orchestrator.active().get("u1"), "A3-0001");

    let reply = turn(&orchestrator, "u1", "/continue `X-001`");
    assert!(reply.text.starts_with("🆕 Активный проект: X-001"));
    assert!(reply.text.contains("📌 Шаг 1: Сырая проблема"));
    assert_eq!(orchestrator.active().get("u1"), "X-001");
    assert!(orchestrator.projects().exists("X-001"));

    turn(&orchestrator, "u1", RAW);
    assert_eq!(
        orchestrator.projects().load("X-001").current_step,
        Step::ProblemSpec
    );
    assert!(!orchestrator.projects().exists("A3-0001"));
}

#[test]
fn commands_never_advance_or_record_raw_text() {
    let (_dir, _paths, orchestrator) = setup();
    turn(&orchestrator, "u1", RAW);
    let before = orchestrator.projects().load("A3-0001");

    turn(&orchestrator, "u1", "/summary");
    turn(&orchestrator, "u1", "- /projects");

    let after = orchestrator.projects().load("A3-0001");
    assert_eq!(after.current_step, before.current_step);
    assert_eq!(after.data.raw, before.data.raw);
}

#[test]
fn summary_reports_collected_steps() {
    let (_dir, _paths, orchestrator) = setup();
    turn(&orchestrator, "u1", RAW);

    let reply = turn(&orchestrator, "u1", "/summary");
    assert!(reply.text.starts_with("📊 Проект: A3-0001"));
    assert!(reply.text.contains("Текущий шаг: 2"));
    assert!(reply.text.contains(&format!("- {RAW}")));
    assert!(reply.text.contains("Команда: `анализ проекта`"));
}

#[test]
fn review_and_hypothesis_report_generation_failures() {
    let (_dir, _paths, orchestrator) = setup();

    let reply = turn(&orchestrator, "u1", "/гипотеза");
    assert!(reply.text.starts_with("⚠️ Сначала опиши проблему на шаге 1"));

    turn(&orchestrator, "u1", RAW);
    let reply = turn(&orchestrator, "u1", "анализ проекта");
    assert!(reply
        .text
        .starts_with("⚠️ Не удалось выполнить анализ проекта через `gpt-5.2`."));

    let reply = turn(&orchestrator, "u1", "/гипотеза");
    assert!(reply.text.starts_with("⚠️ Не удалось сгенерировать гипотезу:"));
}

#[test]
fn edit_mode_round_trip() {
    let (_dir, _paths, orchestrator) = setup();
    turn(&orchestrator, "u1", RAW);

    let reply = turn(&orchestrator, "u1", "/edit");
    assert!(reply.text.starts_with("✏️ Режим редактирования проекта `A3-0001`"));
    assert!(reply.text.contains(&format!("Проблема: {RAW}")));
    assert!(orchestrator.projects().load("A3-0001").meta.edit_mode);

    let reply = turn(&orchestrator, "u1", "Масштаб: 50 заявок\nЦвет: синий");
    assert!(reply.text.starts_with("✅ Сохранено: Масштаб"));
    assert!(reply.text.contains("Масштаб: 50 заявок"));

    let reply = turn(&orchestrator, "u1", "Деньги: 5");
    assert!(reply.text.starts_with("⚠️ Ошибки валидации"));
    assert!(reply.text.contains("Поле «Деньги» слишком короткое"));

    let reply = turn(&orchestrator, "u1", "что-то без полей");
    assert!(reply.text.starts_with("⚠️ Не распознал поля."));

    let reply = turn(&orchestrator, "u1", "Готово");
    assert_eq!(reply.text, "✅ Редактирование завершено.");

    let saved = orchestrator.projects().load("A3-0001");
    assert!(!saved.meta.edit_mode);
    assert_eq!(saved.steps().problem_spec.scale, "50 заявок");
    assert_eq!(saved.steps().problem_spec.money_impact, "");
    assert_eq!(saved.current_step, Step::ProblemSpec);
}

#[test]
fn corrupt_state_file_restarts_from_the_skeleton() {
    let (_dir, paths, orchestrator) = setup();
    fs::write(paths.projects_dir().join("A3-0001.json"), "{ not json").expect("write corrupt");

    let reply = turn(&orchestrator, "u1", RAW);
    assert!(reply.text.starts_with("✅ Шаг 1 готов."));

    let saved = orchestrator.projects().load("A3-0001");
    assert_eq!(saved.project_id, "A3-0001");
    assert_eq!(saved.current_step, Step::ProblemSpec);

    let log = fs::read_to_string(paths.runtime_log_path()).expect("runtime log");
    assert!(log.contains("state.recovered"));
}

#[test]
fn unknown_step_number_reads_as_complete() {
    let (_dir, paths, orchestrator) = setup();
    fs::write(
        paths.projects_dir().join("A3-0001.json"),
        r#"{"project_id": "A3-0001", "current_step": 12}"#,
    )
    .expect("write state");

    let reply = turn(&orchestrator, "u1", "привет");
    assert!(reply.text.starts_with("✅ Сохранено."));
    assert!(reply.text.contains("Текущий шаг: 8"));
}

#[test]
fn turns_from_path_like_user_ids_are_refused() {
    let (_dir, paths, orchestrator) = setup();

    let err = orchestrator
        .handle_turn("../../outside", "/startnew")
        .expect_err("user id must be validated");
    assert!(matches!(err, OrchestratorError::InvalidUser(_)));
    assert!(orchestrator.handle_turn("a/b", RAW).is_err());

    assert!(!paths.root.join("outside.json").exists());
    assert!(!orchestrator.projects().exists("00001"));
    assert!(!orchestrator.projects().exists("A3-0001"));
}
