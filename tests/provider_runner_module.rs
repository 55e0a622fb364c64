use a3coach::provider::{
    ChatMessage, ModelRunner, ProviderError, TextGenerator, JSON_CORRECTION_MESSAGE,
};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::VecDeque;

struct ScriptedGenerator {
    replies: RefCell<VecDeque<Result<Value, ProviderError>>>,
    calls: RefCell<Vec<(String, Vec<ChatMessage>)>>,
}

impl ScriptedGenerator {
    fn new(replies: Vec<Result<Value, ProviderError>>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn models(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(m, _)| m.clone()).collect()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<Value, ProviderError> {
        self.calls
            .borrow_mut()
            .push((model.to_string(), messages.to_vec()));
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Unavailable("script exhausted".to_string())))
    }
}

fn envelope(content: &str) -> Result<Value, ProviderError> {
    Ok(json!({"choices": [{"message": {"content": content}}]}))
}

fn request_failure(model: &str) -> Result<Value, ProviderError> {
    Err(ProviderError::Request {
        model: model.to_string(),
        message: "HTTP 404".to_string(),
    })
}

fn prompt() -> Vec<ChatMessage> {
    vec![ChatMessage::system("sys"), ChatMessage::user("user")]
}

#[test]
fn candidates_put_configured_model_first_and_drop_duplicates() {
    let runner = ModelRunner::new(ScriptedGenerator::new(vec![]), "custom-model", "");
    assert_eq!(runner.candidates(), ["custom-model", "gpt-5.2"]);

    let runner = ModelRunner::new(ScriptedGenerator::new(vec![]), "gpt-5.2", "");
    assert_eq!(runner.candidates(), ["gpt-5.2"]);

    let runner = ModelRunner::new(ScriptedGenerator::new(vec![]), "  ", "");
    assert_eq!(runner.candidates(), ["gpt-5.2"]);
}

#[test]
fn failed_candidate_falls_through_to_the_default_model() {
    let generator = ScriptedGenerator::new(vec![
        request_failure("custom-model"),
        envelope(r#"{"hints": ["Где: на объекте"]}"#),
    ]);
    let runner = ModelRunner::new(&generator, "custom-model", "custom-model");

    let value = runner.call_json(&prompt()).expect("second candidate answers");
    assert_eq!(value["hints"][0], "Где: на объекте");
    assert_eq!(generator.models(), ["custom-model", "gpt-5.2"]);
}

#[test]
fn malformed_envelope_counts_as_candidate_failure() {
    let generator = ScriptedGenerator::new(vec![
        Ok(json!({"choices": []})),
        envelope("ответ"),
    ]);
    let runner = ModelRunner::new(&generator, "custom-model", "");

    let (content, model) = runner.chat_once(&prompt()).expect("fallback answers");
    assert_eq!(content, "ответ");
    assert_eq!(model, "gpt-5.2");
}

#[test]
fn every_candidate_failing_reports_each_model() {
    let generator = ScriptedGenerator::new(vec![
        request_failure("custom-model"),
        request_failure("gpt-5.2"),
    ]);
    let runner = ModelRunner::new(&generator, "custom-model", "");

    let err = runner.chat_once(&prompt()).expect_err("no candidate left");
    let text = err.to_string();
    assert!(text.contains("custom-model: request to custom-model failed"));
    assert!(text.contains("gpt-5.2: request to gpt-5.2 failed"));
}

#[test]
fn invalid_json_is_retried_once_with_a_corrective_message() {
    let generator = ScriptedGenerator::new(vec![
        envelope("Вот ответ без JSON"),
        envelope("```json\n{\"ok\": true}\n```"),
    ]);
    let runner = ModelRunner::new(&generator, "gpt-5.2", "");

    let value = runner.call_json(&prompt()).expect("retry succeeds");
    assert_eq!(value, json!({"ok": true}));

    let calls = generator.calls.borrow();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].1.len(), 2);
    assert_eq!(calls[1].1.len(), 3);
    let correction = calls[1].1.last().expect("correction message");
    assert_eq!(correction.role, "user");
    assert_eq!(correction.content, JSON_CORRECTION_MESSAGE);
}

#[test]
fn non_object_json_triggers_the_corrective_retry() {
    let generator = ScriptedGenerator::new(vec![
        envelope("[\"Нет графика\"]"),
        envelope("{\"problems\": [\"Нет графика\"]}"),
    ]);
    let runner = ModelRunner::new(&generator, "gpt-5.2", "");

    let value = runner.call_json(&prompt()).expect("retry succeeds");
    assert_eq!(value, json!({"problems": ["Нет графика"]}));
    let calls = generator.calls.borrow();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[1].1.last().map(|m| m.content.as_str()),
        Some(JSON_CORRECTION_MESSAGE)
    );

    let generator = ScriptedGenerator::new(vec![envelope("null"), envelope("42")]);
    let runner = ModelRunner::new(&generator, "gpt-5.2", "");
    let err = runner.call_json(&prompt()).expect_err("scalars never pass");
    assert!(err.to_string().ends_with("LLM content snippet: 42"));
}

#[test]
fn exhausted_retries_carry_the_last_content_snippet() {
    let generator =
        ScriptedGenerator::new(vec![envelope("не json"), envelope("снова не json")]);
    let runner = ModelRunner::new(&generator, "gpt-5.2", "");

    let err = runner.call_json(&prompt()).expect_err("both attempts invalid");
    assert!(matches!(err, ProviderError::JsonRetriesExhausted { .. }));
    assert!(err.to_string().ends_with("LLM content snippet: снова не json"));
}

#[test]
fn long_snippets_are_truncated() {
    let long = "я".repeat(300);
    let generator = ScriptedGenerator::new(vec![envelope(&long), envelope(&long)]);
    let runner = ModelRunner::new(&generator, "gpt-5.2", "");

    let err = runner.call_json(&prompt()).expect_err("invalid json");
    let text = err.to_string();
    let snippet = text
        .split("LLM content snippet: ")
        .nth(1)
        .expect("snippet present");
    assert_eq!(snippet.chars().count(), 203);
    assert!(snippet.ends_with("..."));
}

#[test]
fn review_uses_only_the_review_model() {
    let generator = ScriptedGenerator::new(vec![envelope("  Сильные стороны: ...  ")]);
    let runner = ModelRunner::new(&generator, "methodologist", "reviewer");

    let review = runner.review(&prompt()).expect("review text");
    assert_eq!(review, "Сильные стороны: ...");
    assert_eq!(generator.models(), ["reviewer"]);

    let runner = ModelRunner::new(ScriptedGenerator::new(vec![]), "methodologist", "");
    assert_eq!(runner.review_model(), "gpt-5.2");
}
