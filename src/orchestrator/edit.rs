//! Edit mode: a closed table of user-facing labels bound to paths inside the
//! step payloads, read and written through a JSON view of the state.

use super::OrchestratorError;
use crate::shared::text::capitalize;
use crate::store::{ProjectState, StepsData};
use serde_json::{Map, Value};

pub const MIN_EDIT_VALUE_CHARS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditField {
    pub label: &'static str,
    pub path: &'static [&'static str],
}

pub const EDIT_FIELDS: &[EditField] = &[
    EditField { label: "проблема", path: &["raw_problem", "raw_problem_sentence"] },
    EditField { label: "где/когда", path: &["problem_spec", "where_when"] },
    EditField { label: "масштаб", path: &["problem_spec", "scale"] },
    EditField { label: "последствия", path: &["problem_spec", "consequences"] },
    EditField { label: "кто страдает", path: &["problem_spec", "who_suffers"] },
    EditField { label: "деньги", path: &["problem_spec", "money_impact"] },
    EditField { label: "событие начала", path: &["process_context", "start_event"] },
    EditField { label: "событие окончания", path: &["process_context", "end_event"] },
    EditField { label: "владелец процесса", path: &["process_context", "owner"] },
    EditField { label: "периметр", path: &["process_context", "perimeter"] },
    EditField { label: "название процесса", path: &["process_definition", "process_name"] },
    EditField { label: "название проекта", path: &["process_definition", "project_title"] },
];

pub fn field_by_label(label: &str) -> Option<&'static EditField> {
    let label = label.trim().to_lowercase();
    EDIT_FIELDS.iter().find(|field| field.label == label)
}

/// Walks `path`; anything missing or non-textual reads as empty.
pub fn get_path(root: &Value, path: &[&str]) -> String {
    let mut node = root;
    for key in path {
        match node.get(*key) {
            Some(next) => node = next,
            None => return String::new(),
        }
    }
    match node {
        Value::String(text) => text.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Writes `value` at `path`, replacing any non-object on the way with an
/// empty object.
pub fn set_path(root: &mut Value, path: &[&str], value: &str) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut node = root;
    for key in parents {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        let Value::Object(map) = node else {
            return;
        };
        let child = map
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !child.is_object() {
            *child = Value::Object(Map::new());
        }
        node = child;
    }
    if let Value::Object(map) = node {
        map.insert(last.to_string(), Value::String(value.to_string()));
    }
}

/// `Label: value` pairs naming known fields, in message order. A repeated
/// label keeps its last value.
pub fn parse_edit_message(text: &str) -> Vec<(&'static EditField, String)> {
    let mut out: Vec<(&'static EditField, String)> = Vec::new();
    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let Some(field) = field_by_label(key) else {
            continue;
        };
        match out.iter_mut().find(|(seen, _)| seen.label == field.label) {
            Some(slot) => slot.1 = value.to_string(),
            None => out.push((field, value.to_string())),
        }
    }
    out
}

pub fn validate_edit_fields(fields: &[(&'static EditField, String)]) -> Vec<String> {
    fields
        .iter()
        .filter(|(_, value)| value.trim().chars().count() < MIN_EDIT_VALUE_CHARS)
        .map(|(field, _)| {
            format!(
                "Поле «{}» слишком короткое (мин. {MIN_EDIT_VALUE_CHARS} символа).",
                capitalize(field.label)
            )
        })
        .collect()
}

pub fn edit_view(state: &ProjectState) -> Result<String, OrchestratorError> {
    let view = serde_json::to_value(state.steps())?;
    let mut lines = vec![
        format!("✏️ Режим редактирования проекта `{}`\n", state.project_id),
        "Отредактируй нужные поля в блоке ниже, скопируй и отправь обратно.".to_string(),
        "Чтобы выйти без изменений — напиши `готово`.\n".to_string(),
        "```".to_string(),
    ];
    for field in EDIT_FIELDS {
        lines.push(format!(
            "{}: {}",
            capitalize(field.label),
            get_path(&view, field.path)
        ));
    }
    lines.push("```".to_string());
    Ok(lines.join("\n"))
}

/// Applies validated edits to the step payloads.
pub fn apply_edits(
    state: &mut ProjectState,
    fields: &[(&'static EditField, String)],
) -> Result<(), OrchestratorError> {
    let mut view = serde_json::to_value(state.steps())?;
    for (field, value) in fields {
        set_path(&mut view, field.path, value);
    }
    *state.steps_mut() = serde_json::from_value::<StepsData>(view)?;
    Ok(())
}

/// One turn while edit mode is on.
pub fn handle_edit_turn(state: &mut ProjectState, text: &str) -> Result<String, OrchestratorError> {
    if crate::intent::is_edit_exit(text) {
        state.meta.edit_mode = false;
        return Ok("✅ Редактирование завершено.".to_string());
    }
    let fields = parse_edit_message(text);
    if fields.is_empty() {
        return Ok(format!(
            "⚠️ Не распознал поля. Используй формат `Поле: значение`.\n\n{}",
            edit_view(state)?
        ));
    }
    let errors = validate_edit_fields(&fields);
    if !errors.is_empty() {
        let lines = errors
            .iter()
            .map(|err| format!("- {err}"))
            .collect::<Vec<_>>()
            .join("\n");
        return Ok(format!("⚠️ Ошибки валидации:\n{lines}"));
    }
    apply_edits(state, &fields)?;
    let changed = fields
        .iter()
        .map(|(field, _)| capitalize(field.label))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("✅ Сохранено: {changed}\n\n{}", edit_view(state)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_path_creates_missing_objects() {
        let mut root = json!({"problem_spec": "broken"});
        set_path(&mut root, &["problem_spec", "scale"], "10 объектов");
        set_path(&mut root, &["process_definition", "process_name"], "Согласование");
        assert_eq!(get_path(&root, &["problem_spec", "scale"]), "10 объектов");
        assert_eq!(
            get_path(&root, &["process_definition", "process_name"]),
            "Согласование"
        );
        assert_eq!(get_path(&root, &["missing", "field"]), "");
    }

    #[test]
    fn unknown_labels_and_blank_values_are_ignored() {
        let fields = parse_edit_message("Масштаб: 5 участков\nЦвет: синий\nДеньги:\nмасштаб: 6 участков");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].0.label, "масштаб");
        assert_eq!(fields[0].1, "6 участков");
    }

    #[test]
    fn short_values_fail_validation() {
        let fields = parse_edit_message("Деньги: 5");
        assert_eq!(
            validate_edit_fields(&fields),
            vec!["Поле «Деньги» слишком короткое (мин. 3 символа).".to_string()]
        );
    }
}
