use a3coach::gate::{
    contains_solution_language, is_weak, looks_like_later_step_template, looks_like_one_sentence,
    looks_like_step3_template,
    metric_count_ok, problem_spec_strength, step3_context_missing, step3_context_ready,
};
use a3coach::intent::{
    first_command_line, is_confirmation, is_edit_exit, is_fix_root_command, is_regen_command,
    parse_command, Command,
};
use a3coach::store::{ProblemSpec, ProcessContext};

#[test]
fn step1_gate_rejects_solutions_and_long_text() {
    assert!(contains_solution_language("Надо внедрить CRM"));
    assert!(!contains_solution_language("Лимиты согласовываются несвоевременно"));

    assert!(looks_like_one_sentence("Одна фраза."));
    assert!(looks_like_one_sentence("Строка\nвторая"));
    assert!(!looks_like_one_sentence("a\nb\nc"));
    assert!(!looks_like_one_sentence("Раз. Два. Три."));
    assert!(!looks_like_one_sentence("   "));
}

#[test]
fn problem_spec_needs_four_filled_and_two_strong() {
    assert!(is_weak(""));
    assert!(is_weak("Пока неизвестно"));
    assert!(!is_weak("40 заявок в месяц"));

    let spec = ProblemSpec {
        where_when: "на объектах".to_string(),
        scale: "40 заявок".to_string(),
        consequences: "не знаю".to_string(),
        who_suffers: "примерно все".to_string(),
        money_impact: String::new(),
    };
    let strength = problem_spec_strength(&spec);
    assert_eq!(strength.filled, 4);
    assert_eq!(strength.strong, 2);
    assert_eq!(strength.strong_fields, ["where_when", "scale"]);
    assert!(strength.passes());

    let weak = ProblemSpec {
        scale: "нет данных".to_string(),
        ..spec
    };
    assert!(!problem_spec_strength(&weak).passes());
}

#[test]
fn step3_readiness_lists_missing_fields() {
    let mut ctx = ProcessContext {
        start_event: "заявка".to_string(),
        end_event: "выезд".to_string(),
        owner: " ".to_string(),
        perimeter: "участок".to_string(),
        result_metrics: vec!["срок".to_string(), " ".to_string()],
    };
    assert_eq!(step3_context_missing(&ctx), ["owner", "result_metrics (>=2)"]);
    assert!(!step3_context_ready(&ctx));

    ctx.owner = "механик".to_string();
    ctx.result_metrics[1] = "доля".to_string();
    assert!(step3_context_ready(&ctx));
}

#[test]
fn step3_template_detection() {
    assert!(looks_like_step3_template("Событие начала: a\nПериметр: b"));
    assert!(looks_like_step3_template("a: 1\nb: 2\nc: 3"));
    assert!(!looks_like_step3_template("Владелец процесса: механик"));
    assert!(!looks_like_step3_template(""));
}

#[test]
fn later_step_templates_are_recognised() {
    assert!(looks_like_later_step_template("Старт: заявка\nФиниш: выезд\nВладелец: механик"));
    assert!(looks_like_later_step_template("Метрики: срок, доля"));
    assert!(looks_like_later_step_template("- Проблемы:\n- одна"));
    assert!(looks_like_later_step_template("Процесс: согласование заявок"));
    assert!(looks_like_later_step_template("Мероприятие: ввести график"));
    assert!(!looks_like_later_step_template("Масштаб: 40 заявок в месяц"));
    assert!(!looks_like_later_step_template("Процесс согласования затянут: ждём неделю"));
    assert!(!looks_like_later_step_template("простои бригад до двух дней"));
}

#[test]
fn metric_count_bounds() {
    assert!(!metric_count_ok(1));
    assert!(metric_count_ok(2));
    assert!(metric_count_ok(5));
    assert!(!metric_count_ok(6));
}

#[test]
fn regen_forms() {
    for text in ["обнови варианты", "🔁 ОБНОВИТЬ ВАРИАНТЫ", "/regen", " r ", "Обнови вариантов"] {
        assert!(is_regen_command(text), "{text}");
    }
    assert!(!is_regen_command("варианты не нужны"));
    assert!(!is_regen_command("обновить"));
}

#[test]
fn commands_are_read_from_the_first_line() {
    assert_eq!(parse_command("/projects"), Some(Command::Projects));
    assert_eq!(parse_command("`/projects`"), Some(Command::Projects));
    assert_eq!(parse_command("/startnew сейчас"), Some(Command::StartNew));
    assert_eq!(parse_command("/создать_проект"), Some(Command::StartNew));
    assert_eq!(
        parse_command("/continue A3-0002"),
        Some(Command::Continue(Some("A3-0002".to_string())))
    );
    assert_eq!(parse_command("/continue"), Some(Command::Continue(None)));
    assert_eq!(parse_command("Анализ проекта"), Some(Command::Review));
    assert_eq!(parse_command("/редактировать"), Some(Command::Edit));
    assert_eq!(parse_command("гипотеза"), Some(Command::Hypothesis));
    assert_eq!(parse_command("* /summary"), Some(Command::Summary));
    assert_eq!(parse_command("обычный ответ"), None);
    assert_eq!(parse_command("обнови варианты"), None);
}

#[test]
fn first_command_line_skips_list_markers() {
    assert_eq!(first_command_line("\n  - > /summary\nещё"), "/summary");
    assert_eq!(first_command_line("обнови варианты"), "");
}

#[test]
fn control_tokens() {
    assert!(is_confirmation("Ок!"));
    assert!(is_confirmation("подтверждаю."));
    assert!(!is_confirmation("ок, но поправлю срок"));
    assert!(is_edit_exit(" Готово "));
    assert!(is_edit_exit("/done"));
    assert!(is_fix_root_command("Зафиксировать как корневую"));
    assert!(!is_fix_root_command("почему?"));
}
