use crate::intent::is_regen_command;
use crate::shared::text::{clean_line, normalize_list, strip_invisible};

/// Suffix marking the user's own step-1 problem inside the step-6 pool.
pub const POOL_MARKER: &str = " (✅ изначальная проблема)";

/// `Проблемы:` header followed by bullet lines; at most ten items.
pub fn parse_problems_template(text: &str) -> Vec<String> {
    let lines: Vec<String> = text
        .lines()
        .map(clean_line)
        .filter(|line| !line.is_empty())
        .collect();
    let Some(head) = lines.first() else {
        return Vec::new();
    };
    if !head.to_lowercase().starts_with("проблемы") {
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
        let item = line.trim_start_matches(&['-', '?', '*', '•'][..]).trim();
        if !item.is_empty() {
            items.push(item.to_string());
        }
    }
    let items = items
        .into_iter()
        .filter(|item| item.to_lowercase() != "проблемы:");
    normalize_list(items, 10)
}

/// A message that mentions problems and carries a bullet list or a
/// `Проблемы:` header. Such text is never a why-answer.
pub fn looks_like_problem_list(text: &str) -> bool {
    let cleaned = strip_invisible(text);
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        return false;
    }
    let lowered = trimmed.to_lowercase();
    if !lowered.contains("проблем") {
        return false;
    }
    if trimmed.contains("\n-") || trimmed.contains("\n•") {
        return true;
    }
    lowered.starts_with("проблемы") && lowered.contains(':')
}

/// Free-form problem, optionally prefixed with `Проблема:`.
pub fn extract_custom_problem(text: &str) -> String {
    let cleaned = strip_invisible(text);
    let trimmed = cleaned.trim();
    if trimmed.is_empty() || is_regen_command(trimmed) {
        return String::new();
    }
    if trimmed.to_lowercase().starts_with("проблема:") {
        return trimmed
            .split_once(':')
            .map(|(_, tail)| tail.trim().to_string())
            .unwrap_or_default();
    }
    trimmed.to_string()
}

pub fn clean_problem_text(text: &str) -> String {
    text.trim()
        .trim_start_matches(&['*', '-', '?', '•'][..])
        .trim()
        .to_string()
}

pub fn strip_pool_marker(text: &str) -> String {
    let trimmed = text.trim();
    trimmed
        .strip_suffix(POOL_MARKER.trim_start())
        .map(|rest| rest.trim_end().to_string())
        .unwrap_or_else(|| trimmed.to_string())
}
