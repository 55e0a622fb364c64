//! Root-cause sub-loop of step 6: a queue of selected problems, one
//! append-only why chain per active problem, at most three root causes each.

use crate::extract::{extract_root_cause_fields, extract_why_check, looks_like_problem_list};
use crate::store::{RootCause, StepsData, WhyEntry};

pub const MAX_ROOT_CAUSES_PER_PROBLEM: usize = 3;
pub const WHY_QUESTION: &str = "Почему?";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WhyChainError {
    #[error("⚠️ Сначала нужно выбрать хотя бы один ответ.")]
    EmptyChain,
    #[error("⚠️ Максимум 3 корневые причины на одну проблему.")]
    RootCauseLimit,
}

/// What happens after a root cause was fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOutcome {
    /// The next pending problem became active.
    NextProblem(String),
    /// Every selected problem has been analysed.
    Finished,
}

/// Starts the loop over `problems`: the first becomes active, the rest wait.
pub fn select_problems(steps: &mut StepsData, problems: Vec<String>) {
    let mut queue = problems.into_iter();
    let active = queue.next().unwrap_or_default();
    let pending: Vec<String> = queue.collect();
    steps.step6_selected_problems = std::iter::once(active.clone())
        .chain(pending.iter().cloned())
        .filter(|problem| !problem.is_empty())
        .collect();
    steps.step6_pending_problems = pending;
    steps.step6_active_problem = active;
    steps.step6_why_chain.clear();
    steps.step6_chains_by_problem.clear();
}

/// Drops chain entries whose answer was a pasted problem list.
pub fn clean_chain(steps: &mut StepsData) {
    steps
        .step6_why_chain
        .retain(|entry| !looks_like_problem_list(&entry.answer));
}

/// Makes sure some problem is active, preferring the raw problem.
pub fn ensure_active_problem(steps: &mut StepsData) {
    if !steps.step6_active_problem.trim().is_empty() {
        return;
    }
    let raw = steps.raw_problem_text().to_string();
    steps.step6_active_problem = if raw.is_empty() {
        steps.step6_problem_pool.first().cloned().unwrap_or_default()
    } else {
        raw
    };
}

/// Appends one answer to the active chain and mirrors the chain per problem.
pub fn record_answer(steps: &mut StepsData, answer: &str) {
    let check = extract_why_check(answer);
    let entry = WhyEntry {
        level: steps.step6_why_chain.len() as u32 + 1,
        effect: steps.step6_active_problem.clone(),
        question: WHY_QUESTION.to_string(),
        answer: answer.trim().to_string(),
        classification: check.classification,
        controllable: check.controllable,
        eliminates_problem: check.eliminates_problem,
        evidence: check.evidence,
    };
    steps.step6_why_chain.push(entry);
    steps.step6_chains_by_problem.insert(
        steps.step6_active_problem.clone(),
        steps.step6_why_chain.clone(),
    );
}

/// Records the last chain answer as a root cause of the active problem.
/// Labelled lines in `text` override the descriptive fields.
pub fn fix_root_cause(steps: &mut StepsData, text: &str) -> Result<FixOutcome, WhyChainError> {
    let Some(last) = steps.step6_why_chain.last().cloned() else {
        return Err(WhyChainError::EmptyChain);
    };
    let problem = steps.step6_active_problem.clone();
    if steps.root_causes_for(&problem) >= MAX_ROOT_CAUSES_PER_PROBLEM {
        return Err(WhyChainError::RootCauseLimit);
    }

    let fields = extract_root_cause_fields(text);
    let root_cause = if fields.root_cause.is_empty() {
        last.answer.clone()
    } else {
        fields.root_cause
    };
    steps.root_causes.push(RootCause {
        problem: problem.clone(),
        root_cause,
        cause_type: fields.cause_type,
        process_point: fields.process_point,
        controllable: if fields.controllable.is_empty() {
            last.controllable
        } else {
            fields.controllable
        },
        change_hint: fields.change_hint,
        linked_chain_level: last.level,
    });
    steps
        .step6_chains_by_problem
        .insert(problem, steps.step6_why_chain.clone());

    Ok(advance(steps))
}

/// Moves to the next pending problem with a fresh chain.
pub fn advance(steps: &mut StepsData) -> FixOutcome {
    if steps.step6_pending_problems.is_empty() {
        return FixOutcome::Finished;
    }
    let next = steps.step6_pending_problems.remove(0);
    steps.step6_active_problem = next.clone();
    steps.step6_why_chain.clear();
    steps.step6_why_suggestions.clear();
    FixOutcome::NextProblem(next)
}

/// Chain answers worth echoing back: problem lists and a first answer that
/// merely repeats the problem are hidden.
pub fn visible_chain(steps: &StepsData) -> Vec<(usize, &WhyEntry)> {
    let problem = steps.step6_active_problem.trim();
    steps
        .step6_why_chain
        .iter()
        .enumerate()
        .filter(|(_, entry)| !looks_like_problem_list(&entry.answer))
        .filter(|(index, entry)| !(*index == 0 && entry.answer.trim() == problem))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps_with(problems: &[&str]) -> StepsData {
        let mut steps = StepsData::default();
        select_problems(&mut steps, problems.iter().map(|p| p.to_string()).collect());
        steps
    }

    #[test]
    fn selection_queues_the_rest() {
        let steps = steps_with(&["A", "B", "C"]);
        assert_eq!(steps.step6_active_problem, "A");
        assert_eq!(steps.step6_pending_problems, vec!["B", "C"]);
        assert_eq!(steps.step6_selected_problems, vec!["A", "B", "C"]);
    }

    #[test]
    fn fixing_without_answers_is_rejected() {
        let mut steps = steps_with(&["A"]);
        assert_eq!(
            fix_root_cause(&mut steps, "зафиксировать"),
            Err(WhyChainError::EmptyChain)
        );
    }

    #[test]
    fn fourth_root_cause_is_rejected() {
        let mut steps = steps_with(&["A"]);
        for answer in ["x", "y", "z"] {
            record_answer(&mut steps, answer);
            assert_eq!(fix_root_cause(&mut steps, "зафикс"), Ok(FixOutcome::Finished));
        }
        record_answer(&mut steps, "w");
        assert_eq!(
            fix_root_cause(&mut steps, "зафикс"),
            Err(WhyChainError::RootCauseLimit)
        );
        assert_eq!(steps.root_causes.len(), 3);
    }

    #[test]
    fn labelled_fields_fill_the_root_cause() {
        let mut steps = steps_with(&["A", "B"]);
        record_answer(&mut steps, "нет регламента");
        let outcome = fix_root_cause(
            &mut steps,
            "зафиксировать как корневую\nТип: процесс\nЧто изменить: ввести регламент",
        )
        .expect("fixed");
        assert_eq!(outcome, FixOutcome::NextProblem("B".to_string()));
        let rc = &steps.root_causes[0];
        assert_eq!(rc.problem, "A");
        assert_eq!(rc.root_cause, "нет регламента");
        assert_eq!(rc.cause_type, "процесс");
        assert_eq!(rc.change_hint, "ввести регламент");
        assert_eq!(rc.linked_chain_level, 1);
        assert!(steps.step6_why_chain.is_empty());
        assert_eq!(steps.step6_chains_by_problem["A"].len(), 1);
    }

    #[test]
    fn repeated_problem_is_hidden_from_chain_echo() {
        let mut steps = steps_with(&["A"]);
        record_answer(&mut steps, "A");
        record_answer(&mut steps, "причина");
        let visible = visible_chain(&steps);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].0, 1);
    }
}
