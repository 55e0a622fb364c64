use crate::shared::text::clean_line;
use crate::store::PlanItem;

/// `Контрмеры:` header followed by bullet lines.
pub fn parse_actions_template(text: &str) -> Vec<String> {
    let lines: Vec<String> = text
        .lines()
        .map(clean_line)
        .filter(|line| !line.is_empty())
        .collect();
    let Some(head) = lines.first() else {
        return Vec::new();
    };
    let head_low: String = head.to_lowercase();
    let compact: String = head_low.chars().filter(|ch| *ch != ':' && *ch != ' ').collect();
    if !compact.starts_with("контрмеры") {
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
        let item = line.trim_start_matches(&['-', '•', '*'][..]).trim();
        if !item.is_empty() {
            items.push(item.to_string());
        }
    }
    items
}

/// Plan blocks of `Мероприятие:` / `Ожидаемый результат:` / `Ответственный:`
/// / `Срок:` lines. A block starts at each `Мероприятие:`; blocks without an
/// action are dropped.
pub fn parse_plan_items(text: &str) -> Vec<PlanItem> {
    let mut items: Vec<PlanItem> = Vec::new();
    let mut current: Option<PlanItem> = None;

    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let low = line.to_lowercase();
        let value = || {
            line.split_once(':')
                .map(|(_, tail)| tail.trim().to_string())
                .unwrap_or_default()
        };
        if low.starts_with("мероприятие:") {
            if let Some(done) = current.take() {
                items.push(done);
            }
            current = Some(PlanItem {
                action: value(),
                ..PlanItem::default()
            });
            continue;
        }
        let item = current.get_or_insert_with(PlanItem::default);
        if low.starts_with("ожидаемый результат:") {
            item.expected_result = value();
        } else if low.starts_with("ответственный:") {
            item.owner = value();
        } else if low.starts_with("срок:") {
            item.due = value();
        }
    }
    if let Some(done) = current.take() {
        items.push(done);
    }

    items
        .into_iter()
        .filter(|item| !item.action.trim().is_empty())
        .collect()
}
