use super::ProviderError;
use crate::shared::text::cached_regex;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Pulls `choices[0].message.content` out of a chat-completion envelope.
pub fn content_from_envelope(envelope: &Value) -> Result<String, ProviderError> {
    if !envelope.is_object() {
        return Err(ProviderError::Envelope(format!(
            "bad_llm_result_type={}",
            value_kind(envelope)
        )));
    }
    let first = match envelope.get("choices").and_then(Value::as_array) {
        Some(choices) if !choices.is_empty() => &choices[0],
        _ => return Err(ProviderError::Envelope("bad_llm_result_choices".to_string())),
    };
    let message = first
        .get("message")
        .filter(|message| message.is_object())
        .ok_or_else(|| ProviderError::Envelope("bad_llm_result_message".to_string()))?;
    match message.get("content") {
        None | Some(Value::Null) => Err(ProviderError::Envelope("empty_llm_content".to_string())),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(other) => Ok(other.to_string()),
    }
}

/// Lenient JSON parse of generated content: tolerates a BOM, a fenced
/// ```json block and prose around the first `{...}` object. The result is
/// always a JSON object.
pub fn safe_json(content: Option<&str>) -> Result<Value, ProviderError> {
    static LEADING_FENCE: OnceLock<Option<Regex>> = OnceLock::new();
    static TRAILING_FENCE: OnceLock<Option<Regex>> = OnceLock::new();
    static OBJECT_BLOCK: OnceLock<Option<Regex>> = OnceLock::new();

    let Some(content) = content else {
        return Err(ProviderError::InvalidJson(
            "Empty LLM content (None)".to_string(),
        ));
    };
    let trimmed = content.trim().trim_start_matches('\u{feff}');
    if trimmed.is_empty() {
        return Err(ProviderError::InvalidJson(
            "Empty LLM content (blank)".to_string(),
        ));
    }

    let mut body = trimmed.to_string();
    if let Some(re) = cached_regex(&LEADING_FENCE, r"(?i)^\s*```(?:json)?\s*") {
        body = re.replace(&body, "").into_owned();
    }
    if let Some(re) = cached_regex(&TRAILING_FENCE, r"\s*```\s*$") {
        body = re.replace(&body, "").into_owned();
    }

    // Only a top-level object counts; arrays and scalars go back for a retry.
    match serde_json::from_str::<Value>(&body) {
        Ok(value @ Value::Object(_)) => return Ok(value),
        Ok(other) => {
            return Err(ProviderError::InvalidJson(format!(
                "LLM returned a JSON {}, expected an object",
                value_kind(&other)
            )))
        }
        Err(_) => {}
    }

    if let Some(found) = cached_regex(&OBJECT_BLOCK, r"(?s)\{.*\}").and_then(|re| re.find(&body)) {
        return serde_json::from_str::<Value>(found.as_str().trim())
            .map_err(|e| ProviderError::InvalidJson(e.to_string()));
    }

    Err(ProviderError::InvalidJson(
        "LLM did not return valid JSON".to_string(),
    ))
}

/// Splits free-form generated text into items, dropping bullets and numbering.
pub fn extract_llm_list(text: &str) -> Vec<String> {
    static BULLET: OnceLock<Option<Regex>> = OnceLock::new();
    let bullet = cached_regex(&BULLET, r"^\s*[-•*\d).]+\s*");
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match bullet {
            Some(re) => re.replace(line, "").into_owned(),
            None => line.to_string(),
        })
        .filter(|line| !line.is_empty())
        .collect()
}

/// Reads a JSON array of scalars as trimmed, non-empty strings.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(text) => text.trim().to_string(),
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .filter(|item| !item.is_empty())
        .collect()
}

/// Reads a scalar field as a trimmed string; anything else reads as empty.
pub fn string_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Number(num)) => num.to_string(),
        _ => String::new(),
    }
}
