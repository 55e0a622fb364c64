use crate::provider::ChatMessage;

const STEP2_SYSTEM: &str = include_str!("assets/step2.system.md");
const STEP2_USER: &str = include_str!("assets/step2.user.md");
const STEP3_CONTEXT_SYSTEM: &str = include_str!("assets/step3_context.system.md");
const STEP3_CONTEXT_USER: &str = include_str!("assets/step3_context.user.md");
const STEP3_NAMING_SYSTEM: &str = include_str!("assets/step3_naming.system.md");
const STEP3_NAMING_USER: &str = include_str!("assets/step3_naming.user.md");
const STEP4_METRICS_SYSTEM: &str = include_str!("assets/step4_metrics.system.md");
const STEP4_METRICS_USER: &str = include_str!("assets/step4_metrics.user.md");
const STEP6_PROBLEMS_SYSTEM: &str = include_str!("assets/step6_problems.system.md");
const STEP6_PROBLEMS_USER: &str = include_str!("assets/step6_problems.user.md");
const WHY_SYSTEM: &str = include_str!("assets/why.system.md");
const WHY_USER: &str = include_str!("assets/why.user.md");
const COUNTERMEASURES_SYSTEM: &str = include_str!("assets/countermeasures.system.md");
const COUNTERMEASURES_USER: &str = include_str!("assets/countermeasures.user.md");
const PLAN_SYSTEM: &str = include_str!("assets/plan.system.md");
const PLAN_USER: &str = include_str!("assets/plan.user.md");
const REVIEW_SYSTEM: &str = include_str!("assets/review.system.md");
const REVIEW_USER: &str = include_str!("assets/review.user.md");
const HYPOTHESIS_SYSTEM: &str = include_str!("assets/hypothesis.system.md");
const HYPOTHESIS_USER: &str = include_str!("assets/hypothesis.user.md");

/// System and user text for one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

impl PromptPair {
    fn render(system: &str, user: &str, values: &[(&str, &str)]) -> Self {
        Self {
            system: render_prompt(system, values),
            user: render_prompt(user, values),
        }
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system.clone()),
            ChatMessage::user(self.user.clone()),
        ]
    }
}

/// Substitutes `{{name}}` tokens. Unknown tokens render as empty text so a
/// prompt never leaks template syntax to the model.
pub fn render_prompt(template: &str, values: &[(&str, &str)]) -> String {
    let mut rendered = String::new();
    let mut cursor = template;

    while let Some(start) = cursor.find("{{") {
        rendered.push_str(&cursor[..start]);
        let after_open = &cursor[start + 2..];
        let Some(close_offset) = after_open.find("}}") else {
            rendered.push_str(&cursor[start..]);
            cursor = "";
            break;
        };
        let token = after_open[..close_offset].trim();
        if let Some((_, value)) = values.iter().find(|(name, _)| *name == token) {
            rendered.push_str(value);
        }
        cursor = &after_open[close_offset + 2..];
    }

    rendered.push_str(cursor);
    rendered.trim_end().to_string()
}

pub fn step2(raw_problem: &str, user_text: &str) -> PromptPair {
    PromptPair::render(
        STEP2_SYSTEM,
        STEP2_USER,
        &[("raw_problem", raw_problem), ("user_text", user_text)],
    )
}

pub fn step3_context(raw_problem: &str, problem_spec: &str, user_text: &str) -> PromptPair {
    PromptPair::render(
        STEP3_CONTEXT_SYSTEM,
        STEP3_CONTEXT_USER,
        &[
            ("raw_problem", raw_problem),
            ("problem_spec", problem_spec),
            ("user_text", user_text),
        ],
    )
}

pub fn step3_naming(raw_problem: &str, problem_spec: &str, process_context: &str) -> PromptPair {
    PromptPair::render(
        STEP3_NAMING_SYSTEM,
        STEP3_NAMING_USER,
        &[
            ("raw_problem", raw_problem),
            ("problem_spec", problem_spec),
            ("process_context", process_context),
        ],
    )
}

pub fn step4_metrics(raw_problem: &str, problem_spec: &str, process_context: &str) -> PromptPair {
    PromptPair::render(
        STEP4_METRICS_SYSTEM,
        STEP4_METRICS_USER,
        &[
            ("raw_problem", raw_problem),
            ("problem_spec", problem_spec),
            ("process_context", process_context),
        ],
    )
}

pub struct ProblemsPromptInput<'a> {
    pub raw_problem: &'a str,
    pub problem_spec: &'a str,
    pub process_context: &'a str,
    pub current_metrics: &'a str,
    pub target_metrics: &'a str,
}

pub fn step6_problems(input: &ProblemsPromptInput<'_>) -> PromptPair {
    PromptPair::render(
        STEP6_PROBLEMS_SYSTEM,
        STEP6_PROBLEMS_USER,
        &[
            ("raw_problem", input.raw_problem),
            ("problem_spec", input.problem_spec),
            ("process_context", input.process_context),
            ("current_metrics", input.current_metrics),
            ("target_metrics", input.target_metrics),
        ],
    )
}

pub fn why(effect: &str) -> PromptPair {
    PromptPair::render(WHY_SYSTEM, WHY_USER, &[("effect", effect)])
}

pub struct CountermeasurePromptInput<'a> {
    pub root_cause: &'a str,
    pub process_context: &'a str,
    pub problem_spec: &'a str,
    pub current_metrics: &'a str,
    pub target_metrics: &'a str,
}

pub fn countermeasures(input: &CountermeasurePromptInput<'_>) -> PromptPair {
    PromptPair::render(
        COUNTERMEASURES_SYSTEM,
        COUNTERMEASURES_USER,
        &[
            ("root_cause", input.root_cause),
            ("process_context", input.process_context),
            ("problem_spec", input.problem_spec),
            ("current_metrics", input.current_metrics),
            ("target_metrics", input.target_metrics),
        ],
    )
}

pub fn plan(actions: &[String], process_context: &str) -> PromptPair {
    let bullets = actions
        .iter()
        .map(|action| format!("- {action}"))
        .collect::<Vec<_>>()
        .join("\n");
    PromptPair::render(
        PLAN_SYSTEM,
        PLAN_USER,
        &[("actions", &bullets), ("process_context", process_context)],
    )
}

pub fn review(summary: &str) -> PromptPair {
    PromptPair::render(REVIEW_SYSTEM, REVIEW_USER, &[("summary", summary)])
}

pub fn hypothesis(raw_problem: &str, spec_text: &str, process_text: &str) -> PromptPair {
    PromptPair::render(
        HYPOTHESIS_SYSTEM,
        HYPOTHESIS_USER,
        &[
            ("raw_problem", raw_problem),
            ("spec_text", spec_text),
            ("process_text", process_text),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_substituted() {
        assert_eq!(
            render_prompt("a {{x}} b {{ y }}\n\n", &[("x", "1"), ("y", "2")]),
            "a 1 b 2"
        );
    }

    #[test]
    fn unknown_and_unclosed_placeholders_do_not_panic() {
        assert_eq!(render_prompt("a {{missing}} b", &[]), "a  b");
        assert_eq!(render_prompt("a {{open", &[]), "a {{open");
    }

    #[test]
    fn builtin_prompts_leave_no_template_tokens() {
        let pair = step3_context("сырая", "{}", "");
        assert!(!pair.user.contains("{{"));
        assert!(pair.user.contains("Сырая проблема: сырая"));

        let pair = plan(&["A".to_string(), "B".to_string()], "{}");
        assert!(pair.user.contains("- A\n- B"));
        assert_eq!(pair.messages().len(), 2);
    }
}
