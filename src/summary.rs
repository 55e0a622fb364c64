//! Read-only renderings of a project: the `/summary` report and the draft
//! hypothesis built from a generated A3 JSON.

use crate::store::{ProjectState, StepsData};
use serde_json::Value;

const SPEC_LABELS: [(&str, &str); 5] = [
    ("Где/когда", "where_when"),
    ("Масштаб", "scale"),
    ("Последствия", "consequences"),
    ("Кто страдает", "who_suffers"),
    ("Деньги", "money_impact"),
];

const CHAIN_TAIL: usize = 3;
const DASH: &str = "—";

fn or_dash(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        DASH
    } else {
        trimmed
    }
}

fn metric_line(metric: &str, value: &str) -> String {
    if value.trim().is_empty() {
        format!("- {metric}")
    } else {
        format!("- {metric}: {}", value.trim())
    }
}

pub fn summary_lines(state: &ProjectState) -> Vec<String> {
    let steps = state.steps();
    let mut lines = vec![
        format!("📊 Проект: {}", state.project_id),
        String::new(),
        format!("Текущий шаг: {}", state.current_step),
        String::new(),
    ];

    lines.push("Шаг 1 — Сырая проблема:".to_string());
    let raw = steps.raw_problem_text();
    lines.push(if raw.is_empty() {
        "- ещё не задана".to_string()
    } else {
        format!("- {raw}")
    });
    lines.push(String::new());

    lines.push("Шаг 2 — Конкретизация:".to_string());
    if steps.problem_spec.is_empty() {
        lines.push("- ещё не заполнена".to_string());
    } else {
        for ((label, _), value) in SPEC_LABELS.iter().zip(steps.problem_spec.values()) {
            lines.push(format!("- {label}: {}", or_dash(value)));
        }
    }
    lines.push(String::new());

    push_process(&mut lines, steps);
    push_metrics(&mut lines, steps);
    push_root_causes(&mut lines, steps);

    lines.push("Шаг 7 — План улучшений:".to_string());
    if steps.step7_plan.is_empty() {
        lines.push("- ещё не задан".to_string());
    } else {
        for item in &steps.step7_plan {
            lines.push(format!(
                "- {} (ответственный: {}, срок: {})",
                item.action,
                or_dash(&item.owner),
                or_dash(&item.due)
            ));
        }
    }
    lines.push(String::new());
    lines
}

fn push_process(lines: &mut Vec<String>, steps: &StepsData) {
    let ctx = &steps.process_context;
    lines.push("Шаг 3 — Процесс (контекст):".to_string());
    if ctx.is_empty() {
        lines.push("- ещё не заполнен".to_string());
    } else {
        lines.push(format!("- Начало: {}", or_dash(&ctx.start_event)));
        lines.push(format!("- Окончание: {}", or_dash(&ctx.end_event)));
        lines.push(format!("- Владелец: {}", or_dash(&ctx.owner)));
        lines.push(format!("- Периметр: {}", or_dash(&ctx.perimeter)));
        if ctx.result_metrics.is_empty() {
            lines.push("- Метрики: ещё не заданы".to_string());
        } else {
            lines.push(format!("- Метрики: {}", ctx.result_metrics.join("; ")));
        }
    }
    lines.push(String::new());

    let definition = &steps.process_definition;
    if !definition.is_empty() {
        lines.push("Шаг 3 — Выбор:".to_string());
        lines.push(format!("- Процесс: {}", or_dash(&definition.process_name)));
        lines.push(format!("- Проект: {}", or_dash(&definition.project_title)));
        lines.push(String::new());
    }
}

fn push_metrics(lines: &mut Vec<String>, steps: &StepsData) {
    lines.push("Шаг 4 — Текущие метрики:".to_string());
    if steps.current_state_metrics.is_empty() {
        lines.push("- ещё не заданы".to_string());
    }
    for metric in &steps.current_state_metrics {
        lines.push(metric_line(&metric.metric, &metric.current_value));
    }
    lines.push(String::new());

    lines.push("Шаг 5 — Целевые значения:".to_string());
    if steps.target_state_metrics.is_empty() {
        lines.push("- ещё не заданы".to_string());
    }
    for metric in &steps.target_state_metrics {
        lines.push(metric_line(&metric.metric, &metric.target_value));
    }
    lines.push(String::new());
}

fn push_root_causes(lines: &mut Vec<String>, steps: &StepsData) {
    lines.push("Шаг 6 — Анализ причин:".to_string());
    let mut any = false;

    let active = steps.step6_active_problem.trim();
    if !active.is_empty() {
        any = true;
        lines.push(format!("- Активная проблема: {active}"));
    }
    if !steps.step6_why_chain.is_empty() {
        any = true;
        lines.push("- Цепочка почему (последние 3):".to_string());
        let skip = steps.step6_why_chain.len().saturating_sub(CHAIN_TAIL);
        for entry in steps.step6_why_chain.iter().skip(skip) {
            lines.push(format!("  - Почему {}: {}", entry.level, entry.answer));
        }
    }
    if !steps.step6_chains_by_problem.is_empty() {
        any = true;
        lines.push("- Цепочки почему:".to_string());
        for (problem, chain) in &steps.step6_chains_by_problem {
            lines.push(format!("  - Проблема: {problem}"));
            for entry in chain {
                lines.push(format!("    - Почему {}: {}", entry.level, entry.answer));
            }
        }
    }
    if !steps.root_causes.is_empty() {
        any = true;
        lines.push("- Корневые причины:".to_string());
        for rc in &steps.root_causes {
            lines.push(format!("  - {} -> {}", or_dash(&rc.problem), rc.root_cause));
        }
    }
    if !any {
        lines.push("- нет данных".to_string());
    }
    lines.push(String::new());
}

/// One-line step-2 context for the hypothesis prompt.
pub fn hypothesis_spec_text(steps: &StepsData) -> String {
    if steps.problem_spec.is_empty() {
        return "нет данных".to_string();
    }
    SPEC_LABELS
        .iter()
        .zip(steps.problem_spec.values())
        .map(|((label, _), value)| format!("{label}: {}", or_dash(value)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn hypothesis_process_text(steps: &StepsData) -> String {
    let ctx = &steps.process_context;
    if ctx.is_empty() {
        return "нет данных".to_string();
    }
    let metrics = if ctx.result_metrics.is_empty() {
        DASH.to_string()
    } else {
        ctx.result_metrics.join(", ")
    };
    format!(
        "Начало: {}, Окончание: {}, Владелец: {}, Периметр: {}, Метрики: {}",
        or_dash(&ctx.start_event),
        or_dash(&ctx.end_event),
        or_dash(&ctx.owner),
        or_dash(&ctx.perimeter),
        metrics
    )
}

fn text_at<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).map_or(DASH, or_dash)
}

fn items_at<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Markdown draft of an A3 report from generated JSON. Missing parts read as a dash.
pub fn render_hypothesis(data: &Value) -> String {
    let mut lines = vec![
        "💡 **Авто-гипотеза A3** *(черновик — данные не сохранены)*\n".to_string(),
        "---".to_string(),
        String::new(),
        "**1. Проблема**".to_string(),
        text_at(data, "problem").to_string(),
        String::new(),
        "**2. Уточнение проблемы**".to_string(),
    ];
    let spec = data.get("spec").cloned().unwrap_or(Value::Null);
    for (label, key) in SPEC_LABELS {
        lines.push(format!("- {label}: {}", text_at(&spec, key)));
    }

    lines.extend([String::new(), "**3. Текущее состояние**".to_string()]);
    for item in items_at(data, "baseline") {
        lines.push(format!(
            "- {}: {}",
            text_at(item, "metric"),
            text_at(item, "current_value")
        ));
    }

    lines.extend([String::new(), "**4. Целевое состояние**".to_string()]);
    for item in items_at(data, "target") {
        lines.push(format!(
            "- {}: {}",
            text_at(item, "metric"),
            text_at(item, "target_value")
        ));
    }

    lines.extend([String::new(), "**5. Коренные причины**".to_string()]);
    for cause in items_at(data, "root_causes") {
        let text = cause.as_str().map_or_else(|| cause.to_string(), str::to_string);
        lines.push(format!("- {text}"));
    }

    lines.extend([String::new(), "**6. Мероприятия**".to_string()]);
    for item in items_at(data, "actions") {
        lines.push(format!(
            "- {} ({}, {})",
            text_at(item, "action"),
            text_at(item, "owner"),
            text_at(item, "due")
        ));
    }

    lines.extend([
        String::new(),
        "**7. Мониторинг**".to_string(),
        text_at(data, "monitoring").to_string(),
        String::new(),
        "---".to_string(),
        "Для сохранения данных продолжи работу по шагам или используй `/edit`.".to_string(),
    ]);
    lines.join("\n")
}
