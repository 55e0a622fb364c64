//! Readiness predicates that decide whether a step may advance.

use crate::store::{ProblemSpec, ProcessContext};

pub const SOLUTION_WORDS: &[&str] = &[
    "автоматиз",
    "оптимиз",
    "внедр",
    "улучш",
    "реализ",
    "разработ",
    "настро",
    "создать",
    "ввести",
    "перейти",
    "сделать",
    "надо",
    "нужно",
];

pub const WEAK_PHRASES: &[&str] = &[
    "неизвестно",
    "пока неизвестно",
    "нет данных",
    "данных нет",
    "сложно сказать",
    "в целом",
    "примерно",
    "приблизительно",
    "не знаю",
    "пока нет",
    "нет информации",
    "не определено",
    "не могу сказать",
];

const STEP3_TEMPLATE_LABELS: &[&str] = &[
    "событие начала",
    "событие окончания",
    "владелец процесса",
    "периметр",
    "метрики результата",
];

pub fn contains_solution_language(text: &str) -> bool {
    let lowered = text.to_lowercase();
    SOLUTION_WORDS.iter().any(|word| lowered.contains(word))
}

/// At most one line break and at most two `.`/`!` terminators.
pub fn looks_like_one_sentence(text: &str) -> bool {
    let stripped = text.trim();
    if stripped.is_empty() {
        return false;
    }
    if stripped.matches('\n').count() >= 2 {
        return false;
    }
    stripped.chars().filter(|ch| matches!(ch, '.' | '!')).count() <= 2
}

/// Blank values count as weak too.
pub fn is_weak(value: &str) -> bool {
    let lowered = value.trim().to_lowercase();
    if lowered.is_empty() {
        return true;
    }
    WEAK_PHRASES.iter().any(|phrase| lowered.contains(phrase))
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecStrength {
    pub filled: usize,
    pub strong: usize,
    pub strong_fields: Vec<&'static str>,
    pub weak_fields: Vec<&'static str>,
}

impl SpecStrength {
    pub const MIN_FILLED: usize = 4;
    pub const MIN_STRONG: usize = 2;

    pub fn passes(&self) -> bool {
        self.filled >= Self::MIN_FILLED && self.strong >= Self::MIN_STRONG
    }
}

pub fn problem_spec_strength(spec: &ProblemSpec) -> SpecStrength {
    let mut strength = SpecStrength::default();
    for (key, value) in ProblemSpec::KEYS.iter().zip(spec.values()) {
        let value = value.trim();
        if !value.is_empty() {
            strength.filled += 1;
        }
        if !value.is_empty() && !is_weak(value) {
            strength.strong += 1;
            strength.strong_fields.push(key);
        } else {
            strength.weak_fields.push(key);
        }
    }
    strength
}

/// Returns the missing field names; an empty list means the context is ready.
pub fn step3_context_missing(ctx: &ProcessContext) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if ctx.start_event.trim().is_empty() {
        missing.push("start_event");
    }
    if ctx.end_event.trim().is_empty() {
        missing.push("end_event");
    }
    if ctx.owner.trim().is_empty() {
        missing.push("owner");
    }
    if ctx.perimeter.trim().is_empty() {
        missing.push("perimeter");
    }
    let metrics = ctx
        .result_metrics
        .iter()
        .filter(|metric| !metric.trim().is_empty())
        .count();
    if metrics < 2 {
        missing.push("result_metrics (>=2)");
    }
    missing
}

pub fn step3_context_ready(ctx: &ProcessContext) -> bool {
    step3_context_missing(ctx).is_empty()
}

/// Two template labels, or three `label: value` lines, mark a filled step-3 template.
pub fn looks_like_step3_template(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }
    let lowered = trimmed.to_lowercase();
    let hits = STEP3_TEMPLATE_LABELS
        .iter()
        .filter(|label| lowered.contains(*label))
        .count();
    if hits >= 2 {
        return true;
    }
    trimmed.lines().filter(|line| line.contains(':')).count() >= 3
}

const LATER_STEP_HEADERS: &[&str] = &["метрики", "проблемы", "процесс", "контрмеры", "мероприятие"];

/// Text written for a later step: a step-3 block, or a `Метрики:`,
/// `Проблемы:`, `Процесс:`, `Контрмеры:` or `Мероприятие:` header line.
pub fn looks_like_later_step_template(text: &str) -> bool {
    if looks_like_step3_template(text) {
        return true;
    }
    text.lines().any(|line| {
        let line = crate::shared::text::clean_line(line).to_lowercase();
        let line = line.trim_start_matches(&['-', '*', '•', '>', ' '][..]);
        line.split_once(':').is_some_and(|(label, _)| {
            LATER_STEP_HEADERS.contains(&label.trim())
        })
    })
}

/// Step 4 accepts between two and five distinct metrics.
pub fn metric_count_ok(count: usize) -> bool {
    (2..=5).contains(&count)
}
