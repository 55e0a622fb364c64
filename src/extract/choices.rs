use crate::shared::text::cached_regex;
use regex::Regex;
use std::sync::OnceLock;

/// Distinct standalone digits in `1..=max`, in order of appearance.
/// `"1, 6, 7, 2"` with `max = 5` gives `[1, 2]`.
pub fn choice_numbers(text: &str, max: usize) -> Vec<usize> {
    static DIGIT: OnceLock<Option<Regex>> = OnceLock::new();
    let Some(re) = cached_regex(&DIGIT, r"\b([1-9])\b") else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for caps in re.captures_iter(text.trim()) {
        let Some(value) = caps.get(1).and_then(|m| m.as_str().parse::<usize>().ok()) else {
            continue;
        };
        if value <= max && !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

/// `"2 B"`, `"2, b"` style pick of a process variant and a project variant.
pub fn choice_pair(text: &str) -> Option<(usize, char)> {
    static PAIR: OnceLock<Option<Regex>> = OnceLock::new();
    let re = cached_regex(&PAIR, r"(?i)\b([1-5])\b.*\b([abc])\b")?;
    let caps = re.captures(text.trim())?;
    let number = caps.get(1)?.as_str().parse::<usize>().ok()?;
    let letter = caps.get(2)?.as_str().chars().next()?.to_ascii_uppercase();
    Some((number, letter))
}

/// Only digits and separators.
pub fn is_numeric_pick(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.chars().any(|ch| ch.is_ascii_digit())
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || ch.is_whitespace() || matches!(ch, ',' | ';' | '.'))
}

/// 1-based picks resolved against a list; out-of-range numbers are skipped.
pub fn pick_by_numbers(items: &[String], numbers: &[usize]) -> Vec<String> {
    numbers
        .iter()
        .filter_map(|n| n.checked_sub(1).and_then(|idx| items.get(idx)))
        .cloned()
        .collect()
}
