/// Approximate self-check of a why-answer, read from keywords in the text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WhyCheck {
    pub classification: String,
    pub controllable: String,
    pub eliminates_problem: String,
    pub evidence: String,
}

fn pick(text: &str, options: &[&str]) -> String {
    options
        .iter()
        .find(|option| text.contains(*option))
        .map(|option| option.to_string())
        .unwrap_or_default()
}

pub fn extract_why_check(text: &str) -> WhyCheck {
    let lowered = text.trim().to_lowercase();
    if lowered.is_empty() {
        return WhyCheck::default();
    }
    WhyCheck {
        classification: pick(&lowered, &["причина", "симптом", "не уверен"]),
        controllable: pick(&lowered, &["да", "частично", "нет"]),
        eliminates_problem: pick(&lowered, &["да", "частично", "не уверен"]),
        evidence: pick(&lowered, &["да", "нет", "нужно собрать"]),
    }
}

/// Labelled lines a user may attach when fixing a root cause.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RootCauseFields {
    pub root_cause: String,
    pub cause_type: String,
    pub process_point: String,
    pub controllable: String,
    pub change_hint: String,
}

pub fn extract_root_cause_fields(text: &str) -> RootCauseFields {
    let mut fields = RootCauseFields::default();
    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let low = line.to_lowercase();
        let Some((_, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().to_string();
        let slot = if low.starts_with("корневая причина:") {
            &mut fields.root_cause
        } else if low.starts_with("тип:") {
            &mut fields.cause_type
        } else if low.starts_with("где в процессе:") {
            &mut fields.process_point
        } else if low.starts_with("управляемость:") {
            &mut fields.controllable
        } else if low.starts_with("что изменить:") {
            &mut fields.change_hint
        } else {
            continue;
        };
        *slot = value;
    }
    fields
}
