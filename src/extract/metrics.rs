use crate::shared::text::{cached_regex, clean_line};
use crate::store::CurrentMetric;
use regex::Regex;
use std::sync::OnceLock;

/// `Метрики:` header followed by bullet lines. Text after the header's colon
/// counts as the first item.
pub fn parse_metrics_template(text: &str) -> Vec<String> {
    let lines: Vec<String> = text
        .lines()
        .map(clean_line)
        .filter(|line| !line.is_empty())
        .collect();
    let Some(head) = lines.first() else {
        return Vec::new();
    };
    if !head.to_lowercase().starts_with("метрики:") {
        return Vec::new();
    }

    let mut items = Vec::new();
    if let Some((_, tail)) = head.split_once(':') {
        let tail = tail.trim();
        if !tail.is_empty() {
            items.push(tail.to_string());
        }
    }
    for line in &lines[1..] {
        let item = line.trim_start_matches(&['-', '•', '*'][..]).trim();
        if !item.is_empty() {
            items.push(item.to_string());
        }
    }
    items
}

fn labelled_tail(line: &str) -> String {
    line.split_once(':')
        .map(|(_, tail)| tail.trim().to_string())
        .unwrap_or_default()
}

/// Custom metrics given as `Метрика:` / `Текущее значение:` pairs, or else
/// as a `;`- or newline-separated list of names.
pub fn custom_metrics(text: &str) -> Vec<CurrentMetric> {
    static PICK_ONLY: OnceLock<Option<Regex>> = OnceLock::new();
    static REGEN: OnceLock<Option<Regex>> = OnceLock::new();
    static VALUE_LABEL: OnceLock<Option<Regex>> = OnceLock::new();

    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let mut pairs = Vec::new();
    let mut idx = 0;
    while idx < lines.len() {
        let line = lines[idx];
        if line.to_lowercase().starts_with("метрика:") {
            let name = labelled_tail(line);
            let mut value = String::new();
            if let Some(next) = lines.get(idx + 1) {
                let next_low = next.to_lowercase();
                if next_low.starts_with("текущее значение:") || next_low.starts_with("значение:") {
                    value = labelled_tail(next);
                    idx += 1;
                }
            }
            if !name.is_empty() {
                pairs.push(CurrentMetric {
                    metric: name,
                    current_value: value,
                });
            }
        }
        idx += 1;
    }
    if !pairs.is_empty() {
        return pairs;
    }

    let pick_only = cached_regex(&PICK_ONLY, r"^(?:[1-5](?:\s*[,:]\s*[1-5])+|[1-5])$");
    let regen = cached_regex(&REGEN, r"(?i)обнови\s+варианты");
    let value_label = cached_regex(&VALUE_LABEL, r"(?i)текущее\s+значение");
    text.split([';', '\n'])
        .map(|part| part.trim().trim_matches(&['-', '?', '*'][..]))
        .filter(|part| !part.is_empty())
        .filter(|part| !pick_only.is_some_and(|re| re.is_match(part)))
        .filter(|part| !regen.is_some_and(|re| re.is_match(part)))
        .filter(|part| !value_label.is_some_and(|re| re.is_match(part)))
        .map(|part| CurrentMetric {
            metric: part.to_string(),
            current_value: String::new(),
        })
        .collect()
}

/// Case-insensitive dedupe on the metric name; the first spelling wins.
pub fn dedupe_metrics(items: Vec<CurrentMetric>) -> Vec<CurrentMetric> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for item in items {
        let name = item.metric.trim().to_string();
        if name.is_empty() {
            continue;
        }
        let key = name.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        out.push(CurrentMetric {
            metric: name,
            current_value: item.current_value.trim().to_string(),
        });
    }
    out
}

/// Fills `values` (one slot per name in `names`) from a reply. Accepts
/// labelled `Метрика:`/`... значение:` pairs, indexed `1) value` lines and
/// unlabelled values taken in order.
pub fn parse_metric_values(text: &str, names: &[String], values: &mut [String]) {
    static INDEXED: OnceLock<Option<Regex>> = OnceLock::new();

    let text = text.trim();
    if text.is_empty() {
        return;
    }
    let indexed = cached_regex(&INDEXED, r"^\s*([1-9])[):.\-]\s*(.+)$");
    let name_index = |name: &str| {
        let wanted = clean_line(name).to_lowercase();
        names
            .iter()
            .position(|candidate| clean_line(candidate).to_lowercase() == wanted)
    };

    let mut current_metric = String::new();
    let mut ordered_values: Vec<String> = Vec::new();
    let mut placed_by_name = 0;
    for line in text.lines().map(clean_line).filter(|line| !line.is_empty()) {
        let low = line.to_lowercase();
        if low.starts_with("метрика:") {
            current_metric = clean_line(&labelled_tail(&line));
            continue;
        }
        if low.starts_with("текущее значение:")
            || low.starts_with("целевое значение:")
            || low.starts_with("значение:")
        {
            let value = clean_line(&labelled_tail(&line));
            if value.is_empty() {
                continue;
            }
            ordered_values.push(value.clone());
            if !current_metric.is_empty() {
                if let Some(idx) = name_index(&current_metric) {
                    if let Some(slot) = values.get_mut(idx) {
                        *slot = value;
                        placed_by_name += 1;
                    }
                }
            }
            continue;
        }
        if let Some(caps) = indexed.and_then(|re| re.captures(&line)) {
            let idx = caps
                .get(1)
                .and_then(|m| m.as_str().parse::<usize>().ok())
                .and_then(|n| n.checked_sub(1));
            let value = caps.get(2).map(|m| clean_line(m.as_str())).unwrap_or_default();
            if let Some(slot) = idx.and_then(|idx| values.get_mut(idx)) {
                *slot = value;
            }
        }
    }

    // Values already matched to their metric names need no positional pass.
    if ordered_values.is_empty() || placed_by_name == ordered_values.len() {
        return;
    }
    if ordered_values.len() == values.len() {
        for (slot, value) in values.iter_mut().zip(ordered_values) {
            *slot = value;
        }
        return;
    }
    let missing: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(_, value)| clean_line(value).is_empty())
        .map(|(idx, _)| idx)
        .collect();
    for (idx, value) in missing.into_iter().zip(ordered_values) {
        values[idx] = value;
    }
}
