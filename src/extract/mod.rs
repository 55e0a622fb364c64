//! Field extraction from free text. Every parser here is pure: it never
//! touches project state and never fails, returning empty output instead.

pub mod actions;
pub mod choices;
pub mod metrics;
pub mod problems;
pub mod why;

pub use actions::{parse_actions_template, parse_plan_items};
pub use choices::{choice_numbers, choice_pair, is_numeric_pick, pick_by_numbers};
pub use metrics::{custom_metrics, dedupe_metrics, parse_metric_values, parse_metrics_template};
pub use problems::{
    clean_problem_text, extract_custom_problem, looks_like_problem_list, parse_problems_template,
    strip_pool_marker, POOL_MARKER,
};
pub use why::{extract_root_cause_fields, extract_why_check, RootCauseFields, WhyCheck};

use crate::shared::text::clean_line;
use crate::store::{ProblemSpec, ProcessContext};
use std::collections::BTreeMap;

/// Closed label table for one step template: `(label, field)`.
#[derive(Debug, Clone, Copy)]
pub struct FieldSchema {
    pub labels: &'static [(&'static str, &'static str)],
}

pub const PROBLEM_SPEC_SCHEMA: FieldSchema = FieldSchema {
    labels: &[
        ("где/когда", "where_when"),
        ("масштаб", "scale"),
        ("последствия", "consequences"),
        ("кто страдает", "who_suffers"),
        ("деньги", "money_impact"),
    ],
};

pub const PROCESS_CONTEXT_SCHEMA: FieldSchema = FieldSchema {
    labels: &[
        ("событие начала", "start_event"),
        ("событие окончания", "end_event"),
        ("владелец процесса", "owner"),
        ("периметр", "perimeter"),
        ("метрики результата", "result_metrics"),
    ],
};

impl FieldSchema {
    /// Resolves a line head to a field. A parenthesised remark after the
    /// label, as in `Метрики результата (2–4, без чисел)`, is accepted.
    pub fn field_for(&self, head: &str) -> Option<&'static str> {
        let head = clean_line(head).to_lowercase();
        self.labels.iter().find_map(|(label, field)| {
            let matches = head == *label
                || head
                    .strip_prefix(label)
                    .is_some_and(|rest| rest.trim_start().starts_with('('));
            matches.then_some(*field)
        })
    }
}

/// Template strategy: `Label: value` lines matched against the schema.
/// Unlabelled lines and empty values are ignored; a later line wins.
pub fn template_fields(schema: &FieldSchema, text: &str) -> BTreeMap<&'static str, String> {
    let mut out = BTreeMap::new();
    for line in text.lines() {
        let Some((head, value)) = line.split_once(':') else {
            continue;
        };
        let value = clean_line(value);
        if value.is_empty() {
            continue;
        }
        if let Some(field) = schema.field_for(head) {
            out.insert(field, value);
        }
    }
    out
}

pub fn problem_spec_from_template(text: &str) -> ProblemSpec {
    let mut spec = ProblemSpec::default();
    for (field, value) in template_fields(&PROBLEM_SPEC_SCHEMA, text) {
        if let Some(slot) = spec.slot_mut(field) {
            *slot = value;
        }
    }
    spec
}

fn split_metric_tokens(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split([';', ','])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Bullet lines after the metrics label continue the metrics list until the
/// next labelled line.
fn trailing_metric_bullets(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut in_block = false;
    for line in text.lines().map(clean_line).filter(|line| !line.is_empty()) {
        if line.contains(':') {
            in_block = line.to_lowercase().contains("метрик");
            continue;
        }
        if in_block {
            let token = line.trim_start_matches(&['-', '*', '•', ' '][..]).trim();
            if !token.is_empty() {
                tokens.push(token.to_string());
            }
        }
    }
    tokens
}

pub fn process_context_from_template(text: &str) -> ProcessContext {
    let fields = template_fields(&PROCESS_CONTEXT_SCHEMA, text);
    let take = |key: &str| fields.get(key).cloned().unwrap_or_default();
    let mut result_metrics: Vec<String> = fields
        .get("result_metrics")
        .map(|value| split_metric_tokens(value).collect())
        .unwrap_or_default();
    result_metrics.extend(trailing_metric_bullets(text));
    ProcessContext {
        start_event: take("start_event"),
        end_event: take("end_event"),
        owner: take("owner"),
        perimeter: take("perimeter"),
        result_metrics,
    }
}

/// Positional fallback for step 3: the first five `x: y` lines are read in
/// template order regardless of their labels. At most four metrics are kept.
pub fn step3_positional_fallback(text: &str) -> ProcessContext {
    let text = text.trim();
    let mut out = ProcessContext::default();
    if text.is_empty() {
        return out;
    }

    let values: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| line.contains(':'))
        .take(5)
        .map(|line| {
            line.split_once(':')
                .map(|(_, value)| value.trim().to_string())
                .unwrap_or_default()
        })
        .collect();

    let mut slots = [
        &mut out.start_event,
        &mut out.end_event,
        &mut out.owner,
        &mut out.perimeter,
    ];
    for (slot, value) in slots.iter_mut().zip(values.iter()) {
        **slot = value.clone();
    }

    let mut metric_tokens: Vec<String> = values
        .get(4)
        .map(|value| split_metric_tokens(value).collect())
        .unwrap_or_default();
    metric_tokens.extend(trailing_metric_bullets(text));
    out.result_metrics = metric_tokens.into_iter().take(4).collect();
    out
}
