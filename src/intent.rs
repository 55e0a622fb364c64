//! Recognition of global commands and control tokens in an inbound message.

use crate::shared::text::{cached_regex, strip_invisible};
use regex::Regex;
use std::sync::OnceLock;

const REGEN_TOKENS: &[&str] = &["/regen", "regen", "r", "/refresh", "refresh"];
const EDIT_TOKENS: &[&str] = &["/edit", "/редактировать", "редактировать", "/редакт"];
const EDIT_EXIT_TOKENS: &[&str] = &["готово", "/готово", "done", "/done"];
const REVIEW_TOKENS: &[&str] = &["анализ проекта", "/анализ проекта"];
const HYPOTHESIS_TOKENS: &[&str] = &["/гипотеза", "/hypothesis", "гипотеза"];
const START_NEW_PREFIXES: &[&str] = &["/startnew", "/создать проект", "/создать_проект"];
const CONFIRM_TOKENS: &[&str] = &["ок", "окей", "готово", "подтверждаю", "да"];

/// A recognized global command. Anything else is step content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Projects,
    StartNew,
    Continue(Option<String>),
    Summary,
    Review,
    Hypothesis,
    Edit,
}

/// "обнови варианты" and its short forms, tolerant of leading punctuation.
pub fn is_regen_command(text: &str) -> bool {
    static LEADING_PUNCT: OnceLock<Option<Regex>> = OnceLock::new();
    static NATURAL: OnceLock<Option<Regex>> = OnceLock::new();

    let lowered = strip_invisible(text).trim().to_lowercase();
    let stripped = match cached_regex(&LEADING_PUNCT, r"^[^\w/]+") {
        Some(re) => re.replace(&lowered, "").trim().to_string(),
        None => lowered,
    };
    if REGEN_TOKENS.contains(&stripped.as_str()) {
        return true;
    }
    cached_regex(&NATURAL, r"(?:^|[\s/])обнови(?:ть)?\s+вариант(?:ы|ов)\b")
        .is_some_and(|re| re.is_match(&stripped))
}

/// First non-empty line with list markers removed. Regen messages yield
/// nothing so they fall through to the step handler.
pub fn first_command_line(text: &str) -> String {
    if text.is_empty() || is_regen_command(text) {
        return String::new();
    }
    strip_invisible(text)
        .lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(&['*', '-', '•', '>', ' '][..])
                .trim()
        })
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Command line as typed plus its normalized form (lowercased, backticks
/// dropped). When the first line is empty, a known command is searched for
/// anywhere in the message.
pub fn command_line(text: &str) -> (String, String) {
    static FALLBACK: OnceLock<Option<Regex>> = OnceLock::new();

    let mut line = first_command_line(text);
    if line.is_empty() {
        let found = cached_regex(
            &FALLBACK,
            r"(?i)(/(?:startnew|continue|projects|summary|создать(?:\s+|_)проект)\b.*)",
        )
        .and_then(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string());
        if let Some(found) = found {
            line = found;
        }
    }
    let normalized = line.to_lowercase().trim().trim_matches('`').to_string();
    (line, normalized)
}

pub fn parse_command(text: &str) -> Option<Command> {
    let (line, cmd) = command_line(text);
    if cmd.is_empty() {
        return None;
    }
    if cmd == "/projects" {
        return Some(Command::Projects);
    }
    if START_NEW_PREFIXES.iter().any(|prefix| cmd.starts_with(prefix)) {
        return Some(Command::StartNew);
    }
    if cmd.starts_with("/continue") {
        let id = line
            .split_whitespace()
            .nth(1)
            .map(|id| id.trim_matches('`').trim().to_string())
            .filter(|id| !id.is_empty());
        return Some(Command::Continue(id));
    }
    if cmd == "/summary" {
        return Some(Command::Summary);
    }
    if REVIEW_TOKENS.contains(&cmd.as_str()) {
        return Some(Command::Review);
    }
    if HYPOTHESIS_TOKENS.contains(&cmd.as_str()) {
        return Some(Command::Hypothesis);
    }
    if EDIT_TOKENS.contains(&cmd.as_str()) {
        return Some(Command::Edit);
    }
    None
}

pub fn is_edit_exit(text: &str) -> bool {
    EDIT_EXIT_TOKENS.contains(&text.trim().to_lowercase().as_str())
}

/// Plan confirmation: `ок`, `окей`, `готово`, `подтверждаю`, `да`.
pub fn is_confirmation(text: &str) -> bool {
    let lowered = strip_invisible(text).trim().to_lowercase();
    let lowered = lowered.trim_end_matches(&['.', '!'][..]);
    CONFIRM_TOKENS.contains(&lowered)
}

/// "Fix as root cause" request in the why loop.
pub fn is_fix_root_command(text: &str) -> bool {
    text.to_lowercase().contains("зафикс")
}
