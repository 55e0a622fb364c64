//! Step-7 accumulation of countermeasures and the editable improvement plan.

use crate::store::{Countermeasure, PlanItem, StepsData};

pub const PLAN_LIMIT: usize = 15;
pub const SELECTED_ACTIONS_LIMIT: usize = 15;
pub const ACTIONS_PER_ROOT_LIMIT: usize = 5;

pub const MISSING_OWNER_WARNING: &str = "⚠️ Есть мероприятия без ответственного.";
pub const MISSING_DUE_WARNING: &str = "⚠️ Есть мероприятия без срока.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("⚠️ План пока пуст.")]
    Empty,
    #[error("plan has gaps")]
    Incomplete(Vec<&'static str>),
    #[error("⚠️ План может содержать максимум 15 мероприятий. Сократи список и пришли снова.")]
    TooManyItems,
}

pub fn plan_warnings(items: &[PlanItem]) -> Vec<&'static str> {
    let mut warnings = Vec::new();
    if items.iter().any(|item| !item.has_owner()) {
        warnings.push(MISSING_OWNER_WARNING);
    }
    if items.iter().any(|item| !item.has_due()) {
        warnings.push(MISSING_DUE_WARNING);
    }
    warnings
}

/// A plan is final only when it is non-empty and every item has an owner and a due date.
pub fn check_confirmation(items: &[PlanItem]) -> Result<(), PlanError> {
    if items.is_empty() {
        return Err(PlanError::Empty);
    }
    let warnings = plan_warnings(items);
    if warnings.is_empty() {
        Ok(())
    } else {
        Err(PlanError::Incomplete(warnings))
    }
}

/// Replaces the stored plan with a user-edited one.
pub fn replace_plan(steps: &mut StepsData, items: Vec<PlanItem>) -> Result<(), PlanError> {
    if items.len() > PLAN_LIMIT {
        return Err(PlanError::TooManyItems);
    }
    steps.step7_plan = items;
    Ok(())
}

/// Records actions chosen for one root cause.
pub fn record_countermeasure(steps: &mut StepsData, root_cause: &str, actions: Vec<String>) {
    let actions: Vec<String> = actions.into_iter().take(ACTIONS_PER_ROOT_LIMIT).collect();
    steps.step7_selected_actions.extend(actions.iter().cloned());
    steps
        .step7_selected_actions
        .truncate(SELECTED_ACTIONS_LIMIT);
    steps.step7_countermeasures.push(Countermeasure {
        root_cause: root_cause.to_string(),
        actions,
    });
}

/// Plan rendered as the editable template block body.
pub fn plan_template(items: &[PlanItem]) -> String {
    if items.is_empty() {
        return "Мероприятие: ...\nОжидаемый результат: ...\nОтветственный: ...\nСрок: ...".to_string();
    }
    items
        .iter()
        .map(|item| {
            format!(
                "Мероприятие: {}\nОжидаемый результат: {}\nОтветственный: {}\nСрок: {}",
                item.action, item.expected_result, item.owner, item.due
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(owner: &str, due: &str) -> PlanItem {
        PlanItem {
            action: "Ввести регламент".to_string(),
            expected_result: "Срок согласования 2 дня".to_string(),
            owner: owner.to_string(),
            due: due.to_string(),
        }
    }

    #[test]
    fn confirmation_requires_owner_and_due() {
        assert_eq!(check_confirmation(&[]), Err(PlanError::Empty));
        assert_eq!(
            check_confirmation(&[item("", "01.03")]),
            Err(PlanError::Incomplete(vec![MISSING_OWNER_WARNING]))
        );
        assert_eq!(
            check_confirmation(&[item("Иванов", "")]),
            Err(PlanError::Incomplete(vec![MISSING_DUE_WARNING]))
        );
        assert_eq!(check_confirmation(&[item("Иванов", "01.03")]), Ok(()));
    }

    #[test]
    fn selected_actions_are_capped() {
        let mut steps = StepsData::default();
        for root in ["a", "b", "c", "d"] {
            let actions = (0..6).map(|i| format!("{root}{i}")).collect();
            record_countermeasure(&mut steps, root, actions);
        }
        assert_eq!(steps.step7_countermeasures[0].actions.len(), 5);
        assert_eq!(steps.step7_selected_actions.len(), SELECTED_ACTIONS_LIMIT);
    }

    #[test]
    fn oversized_plan_is_rejected() {
        let mut steps = StepsData::default();
        let items = vec![item("a", "b"); 16];
        assert_eq!(replace_plan(&mut steps, items), Err(PlanError::TooManyItems));
        assert!(steps.step7_plan.is_empty());
    }
}
