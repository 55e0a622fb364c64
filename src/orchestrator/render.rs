//! Reply texts. Every user-visible string of the step machine is built here.

use crate::catalog::StepDescriptor;
use crate::plan::plan_template;
use crate::proposals::Step3Context;
use crate::shared::text::backticked_bullets;
use crate::store::{PlanItem, ProcessProposals};

pub const REGEN_LINE: &str = "Чтобы обновить варианты — напиши: `обнови варианты`.";
pub const UPDATED_PREFIX: &str = "🔁 Варианты обновлены.\n\n";

pub const STEP2_TEMPLATE: &str = "Ответь одним сообщением по шаблону:\n```\nГде/когда: ...\nМасштаб: ...\nПоследствия: ...\nКто страдает: ...\nДеньги: ...\n```\n";
pub const STEP3_CONTEXT_TEMPLATE: &str = "Ответь одним сообщением по шаблону:\n```\nСобытие начала: ...\nСобытие окончания: ...\nВладелец процесса: ...\nПериметр: ...\nМетрики результата (2–4, без чисел): ...\n```\n";
pub const STEP3_NAMING_TEMPLATE: &str =
    "Ответь одним сообщением по шаблону:\n```\nПроцесс: ...\nНазвание проекта: ...\n```\n";
pub const METRICS_TEMPLATE: &str =
    "Ответь одним сообщением по шаблону:\n```\nМетрики:\n- ...\n- ...\n```\n";
pub const PROBLEMS_TEMPLATE: &str =
    "Ответь одним сообщением по шаблону:\n```\nПроблемы:\n- ...\n- ...\n```\n";
pub const ACTIONS_TEMPLATE: &str =
    "Ответь одним сообщением по шаблону:\n```\nКонтрмеры:\n- ...\n- ...\n```\n";
pub const VALUES_LATER: &str = "Значения запросим следующим сообщением.\n\n";

/// A hint with a short `label: text` head renders as a bold label.
pub fn fmt_hint(hint: &str) -> String {
    let hint = hint.trim().trim_matches(&['"', '\''][..]);
    if let Some((label, rest)) = hint.split_once(':') {
        let label = label.trim();
        if !label.is_empty() && label.chars().count() < 60 {
            return format!("> **{label}** → {}", rest.trim());
        }
    }
    format!("> {hint}")
}

pub fn hints_block(hints: &[String]) -> String {
    if hints.is_empty() {
        return String::new();
    }
    let body = hints
        .iter()
        .map(|hint| fmt_hint(hint))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("\n\n---\n\n**Подсказки:**\n\n{body}")
}

pub fn step_intro(descriptor: &StepDescriptor, marker: &str) -> String {
    format!(
        "{marker} Шаг {}: {}\n\n{}\n\n",
        descriptor.step_id, descriptor.title, descriptor.instruction
    )
}

pub fn instruction_reminder(descriptor: &StepDescriptor) -> String {
    format!(
        "📌 Шаг {}: {}\n\n{}\n\n✍️ Напиши ответ и отправь сообщение.\n\n",
        descriptor.step_id, descriptor.title, descriptor.instruction
    )
}

pub fn missing_descriptor(step: u32) -> String {
    format!("📌 Текущий шаг: {step}\n\n❗Не найден step_{step}.json в папке steps.\n\n")
}

pub fn step_not_configured(done: &str, step: u32) -> String {
    format!(
        "{done}➡️ Следующий шаг ({step}) ещё не настроен: нет файла `step_{step}.json`.\nСоздай `step_{step}.json`, и продолжим.\n\n"
    )
}

pub fn step2_prompt(descriptor: &StepDescriptor, hints: &[String]) -> String {
    format!(
        "✅ Шаг 1 готов.\n\n➡️ Шаг 2: {}\n\n{}\n\n{STEP2_TEMPLATE}{}",
        descriptor.title,
        descriptor.instruction,
        hints_block(hints)
    )
}

fn examples_block(ctx: &Step3Context) -> String {
    let groups: [(&str, &[String], usize); 4] = [
        ("**Примеры события начала:**", &ctx.examples.start_event, 2),
        ("**Примеры события окончания:**", &ctx.examples.end_event, 2),
        ("**Примеры владельца процесса:**", &ctx.examples.owner, 2),
        ("**Примеры периметра (кто участвует):**", &ctx.examples.perimeter, 5),
    ];
    let mut lines: Vec<String> = Vec::new();
    for (header, items, limit) in groups {
        if items.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(header.to_string());
        lines.extend(items.iter().take(limit).map(|item| format!("- `{item}`")));
    }
    if lines.is_empty() {
        String::new()
    } else {
        format!("\n\n---\n\n{}", lines.join("\n"))
    }
}

/// Hints, examples and metric ideas shown under the step-3 context template.
pub fn step3_context_extras(ctx: &Step3Context) -> String {
    let mut out = hints_block(&ctx.hints);
    out.push_str(&examples_block(ctx));
    if !ctx.metric_suggestions.is_empty() {
        let metrics: Vec<String> = ctx.metric_suggestions.iter().take(5).cloned().collect();
        out.push_str("\n\n**Примеры метрик результата:**\n");
        out.push_str(&backticked_bullets(&metrics));
    }
    out.push_str("\n\n");
    out.push_str(REGEN_LINE);
    out
}

pub fn step3_entry(descriptor: &StepDescriptor, ctx: &Step3Context) -> String {
    format!(
        "✅ Шаг 2 готов.\n\n➡️ Шаг 3: {}\n\n{}\n\n{STEP3_CONTEXT_TEMPLATE}{}",
        descriptor.title,
        descriptor.instruction,
        step3_context_extras(ctx)
    )
}

pub fn step3_missing(
    descriptor: Option<&StepDescriptor>,
    missing: &[&str],
    ctx: &Step3Context,
) -> String {
    let (title, instruction) = descriptor
        .map(|d| (d.title.as_str(), d.instruction.as_str()))
        .unwrap_or(("Процесс", ""));
    let missing_block = if missing.is_empty() {
        String::new()
    } else {
        let lines = missing
            .iter()
            .map(|name| format!("- {name}"))
            .collect::<Vec<_>>()
            .join("\n");
        format!("⚠️ Пока не хватает:\n{lines}\n\n")
    };
    format!(
        "🧩 Шаг 3: {title}\n\n{instruction}\n\n{missing_block}{STEP3_CONTEXT_TEMPLATE}{}",
        step3_context_extras(ctx)
    )
}

pub fn naming_lists(proposals: &ProcessProposals) -> String {
    let mut out = String::new();
    if !proposals.process_variants.is_empty() {
        out.push_str("**Процессы:**\n");
        out.push_str(&numbered_variants(&proposals.process_variants, |i| {
            (i + 1).to_string()
        }));
        out.push_str("\n\n");
    }
    if !proposals.project_variants.is_empty() {
        out.push_str("**Проекты:**\n");
        out.push_str(&numbered_variants(&proposals.project_variants, |i| {
            ((b'A' + i as u8) as char).to_string()
        }));
        out.push_str("\n\n");
    }
    out
}

fn numbered_variants(items: &[String], key: impl Fn(usize) -> String) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("- {}. `{item}`", key(i)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn naming_prompt(proposals: &ProcessProposals) -> String {
    format!(
        "{}{STEP3_NAMING_TEMPLATE}{REGEN_LINE}\n\n",
        naming_lists(proposals)
    )
}

pub fn metric_variants(metrics: &[String]) -> String {
    format!("**Метрики (варианты):**\n{}", backticked_bullets(metrics))
}

pub fn metric_values_prompt(metrics: &[String], label: &str) -> String {
    let pairs = metrics
        .iter()
        .map(|metric| format!("Метрика: {metric}\n{label}: ..."))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("Ответь одним сообщением по шаблону:\n```\n{pairs}\n```\n")
}

pub fn step5_prompt(metrics: &[String]) -> String {
    format!(
        "🧩 Шаг 5: Целевое состояние: показатели, которых хотим добиться\n\n\
         Укажите целевые (желаемые) значения по каждой метрике процесса.\n\
         Это нужно, чтобы зафиксировать каким должен стать процесс после внедрения улучшений (основа для расчёта разрыва и плана действий).\n\
         Заполните значения после «Целевое значение».\n\n{}\n",
        metric_values_prompt(metrics, "Целевое значение")
    )
}

pub fn step4_help(metrics: &[String]) -> String {
    format!(
        "🧩 Шаг 4: Текущее состояние: показатели проблемы\n\n\
         На этом шаге фиксируем показатели процесса, по которым видно, что проблема существует.\n\
         {METRICS_TEMPLATE}\n\
         Справка по сбору данных (кратко):\n\
         проверяемость показателей;\n\
         источник данных (1С/учётная система/журналы/наряды/хронометраж/фото‑видео);\n\
         период;\n\
         где проблема выражена сильнее всего;\n\
         виды потерь (Muda).\n\
         Выбирая показатели, помни: данные нужно подтверждать свидетельствами.\n\n\
         {}\n\n{VALUES_LATER}{REGEN_LINE}\n\n",
        metric_variants(metrics)
    )
}

pub fn problem_pool(pool: &[String]) -> String {
    format!("**Проблемы (варианты):**\n{}\n\n", backticked_bullets(pool))
}

pub fn step6_select_prompt(pool: &[String], updated: bool) -> String {
    format!(
        "{}🧩 Шаг 6: Анализ коренных причин (5 Почему)\n\n\
         Выбери проблемы для анализа (можно несколько) или напиши свою.\n\n\
         {}{PROBLEMS_TEMPLATE}\n{REGEN_LINE}\n\n",
        if updated { UPDATED_PREFIX } else { "" },
        problem_pool(pool)
    )
}

/// Chain lines already given, then the next question with answer variants.
pub fn why_prompt(
    prefix: &str,
    updated: bool,
    problem: &str,
    chain: &[(usize, String)],
    suggestions: &[String],
) -> String {
    let mut out = String::from(prefix);
    if updated {
        out.push_str(UPDATED_PREFIX);
    }
    out.push_str("🧩 Шаг 6: 5 Почему\n\n");
    out.push_str(&format!("Проблема: {problem}\n\n"));
    if !chain.is_empty() {
        let lines = chain
            .iter()
            .map(|(index, answer)| format!("*Почему {}: {answer}*", index + 1))
            .collect::<Vec<_>>()
            .join("\n");
        out.push_str(&lines);
        out.push_str("\n\n");
    }
    out.push_str("Почему?\n\n");
    if !suggestions.is_empty() {
        out.push_str("**Варианты ответа:**\n");
        out.push_str(&backticked_bullets(suggestions));
        out.push_str("\n\n");
    }
    out.push_str(
        "Скопируй один из вариантов или напиши свой ответ.\n\
         Чтобы обновить варианты — напиши: `обнови варианты`.\n\
         Для фиксации корневой причины напиши: `зафиксировать как корневую`.\n",
    );
    out
}

pub fn countermeasure_prompt(
    prefix: &str,
    updated: bool,
    root_cause: &str,
    actions: &[String],
) -> String {
    let mut out = String::from(prefix);
    if updated {
        out.push_str(UPDATED_PREFIX);
    }
    out.push_str(&format!(
        "🧩 Шаг 7: Контрмеры по корневым причинам\n\nКорневая причина: {root_cause}\n\n"
    ));
    if !actions.is_empty() {
        out.push_str("**Контрмеры (варианты):**\n");
        out.push_str(&backticked_bullets(actions));
        out.push_str("\n\n");
    }
    out.push_str(ACTIONS_TEMPLATE);
    out.push_str("\nЧтобы обновить варианты, напиши: `обнови варианты`.\n\n");
    out
}

pub fn plan_prompt(prefix: &str, items: &[PlanItem], warnings: &[&str]) -> String {
    let mut out = String::from(prefix);
    out.push_str(
        "🧩 Шаг 7: План улучшений\n\n\
         Проверь и при необходимости отредактируй план. Ответь по шаблону.\n\n",
    );
    if !warnings.is_empty() {
        out.push_str(&warnings.join("\n"));
        out.push_str("\n\n");
    }
    out.push_str(&format!("```\n{}\n```\n\n", plan_template(items)));
    out.push_str("Если всё ок, напиши: `ок`.\n\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_label_is_bolded() {
        assert_eq!(fmt_hint("\"Где: на объекте\""), "> **Где** → на объекте");
        assert_eq!(fmt_hint("просто текст"), "> просто текст");
    }

    #[test]
    fn naming_lists_are_keyed_for_quick_picks() {
        let text = naming_lists(&ProcessProposals {
            process_variants: vec!["П1".to_string(), "П2".to_string()],
            project_variants: vec!["Проект".to_string()],
        });
        assert!(text.contains("- 2. `П2`"));
        assert!(text.contains("- A. `Проект`"));
    }

    #[test]
    fn why_prompt_lists_chain_and_variants() {
        let text = why_prompt(
            "",
            true,
            "Задержки",
            &[(1, "нет регламента".to_string())],
            &["Причина".to_string()],
        );
        assert!(text.starts_with(UPDATED_PREFIX));
        assert!(text.contains("*Почему 2: нет регламента*"));
        assert!(text.contains("- `Причина`"));
    }
}
