use regex::Regex;
use std::sync::OnceLock;

const INVISIBLE: &[char] = &['\u{feff}', '\u{200b}', '\u{200c}', '\u{200d}'];

/// Drops byte-order marks and zero-width characters that chat clients leave
/// behind when a user copies a template block.
pub fn strip_invisible(text: &str) -> String {
    text.chars().filter(|ch| !INVISIBLE.contains(ch)).collect()
}

/// `strip_invisible` plus NBSP folding and trimming.
pub fn clean_line(text: &str) -> String {
    strip_invisible(text)
        .replace('\u{a0}', " ")
        .trim()
        .to_string()
}

/// Trims every item, drops blanks and keeps at most `limit` entries.
pub fn normalize_list<I, S>(items: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| item.as_ref().trim().to_string())
        .filter(|item| !item.is_empty())
        .take(limit)
        .collect()
}

/// Appends items that are not already present, preserving order.
pub fn push_unique(out: &mut Vec<String>, items: &[&str]) {
    for item in items {
        let item = item.trim();
        if !item.is_empty() && !out.iter().any(|existing| existing == item) {
            out.push(item.to_string());
        }
    }
}

/// Uppercases the first character, as labels are echoed back to the user.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Returns the value after the first `:` when `line` starts with `label`
/// followed by a colon, comparing case-insensitively.
pub fn labelled_value<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let (head, tail) = line.split_once(':')?;
    if head.trim().to_lowercase() == label {
        Some(tail.trim())
    } else {
        None
    }
}

/// Lowercase-prefix test that tolerates a missing colon after the label.
pub fn starts_with_label(line: &str, label: &str) -> bool {
    line.trim().to_lowercase().starts_with(label)
}

pub fn cached_regex(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

pub fn count_cyrillic(text: &str) -> usize {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(|ch| ('а'..='я').contains(ch) || *ch == 'ё')
        .count()
}

pub fn count_latin(text: &str) -> usize {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(|ch| ch.is_ascii_lowercase())
        .count()
}

/// True when Latin letters outnumber Cyrillic ones, which marks generated
/// text that ignored the Russian-only instruction.
pub fn latin_dominates(text: &str) -> bool {
    count_latin(text) > count_cyrillic(text)
}

pub fn backticked_bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- `{item}`"))
        .collect::<Vec<_>>()
        .join("\n")
}
