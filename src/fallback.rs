//! Deterministic Russian suggestions used when generation fails or returns
//! text in the wrong language. No I/O.

use crate::shared::text::{normalize_list, push_unique};
use crate::store::{ProcessContext, ProcessProposals};

const WHY_LOGISTICS_KEYS: &[&str] = &["грузоперев", "перевоз", "асфальтобетон", "смес"];
const WHY_LOGISTICS: &[&str] = &[
    "Планирование рейсов выполняется без актуальных данных по потребности и графику укладки.",
    "Маршруты и загрузка транспорта не оптимизированы, из-за чего растет доля холостых пробегов.",
    "Фактическое время простоев на погрузке и выгрузке не контролируется и не анализируется.",
    "Тарифы и условия перевозки пересматриваются нерегулярно и не привязаны к рыночным изменениям.",
    "Нет единого владельца процесса, который отвечает за стоимость перевозок по всей цепочке.",
];

const WHY_COST_KEYS: &[&str] = &["стоим", "затрат", "расход", "рентабель"];
const WHY_COST: &[&str] = &[
    "Нормативы затрат на перевозку не обновлены под текущие условия проекта.",
    "Отклонения факта от плана выявляются поздно, и корректирующие действия запускаются с задержкой.",
    "Часть затрат учитывается постфактум, поэтому управленческие решения принимаются на неполных данных.",
];

const WHY_GENERIC: &[&str] = &[
    "На входе процесса отсутствуют единые правила и критерии планирования работ.",
    "Ответственность между участниками процесса распределена нечетко, из-за чего решения запаздывают.",
    "Контрольные точки процесса определены формально и не предотвращают отклонения.",
    "Данные для управления процессом собираются несвоевременно и не в полном объеме.",
    "Причины отклонений фиксируются нерегулярно, поэтому ошибки повторяются.",
];

const COUNTER_DATA_KEYS: &[&str] = &["данн", "учет", "точност", "прогноз"];
const COUNTER_DATA: &[&str] = &[
    "Ввести единый шаблон сбора данных по перевозкам и обязательные поля.",
    "Назначить владельца качества данных и регламент проверки перед расчетом.",
    "Настроить контроль полноты данных с еженедельным разбором пропусков.",
    "Устранить дублирование источников данных и определить единый источник истины.",
    "Автоматизировать загрузку данных из учетной системы в расчетные формы.",
];

const COUNTER_ROLES_KEYS: &[&str] = &["соглас", "роль", "ответствен", "координац"];
const COUNTER_ROLES: &[&str] = &[
    "Утвердить RACI по процессу согласования и передачи ведомостей.",
    "Зафиксировать SLA по срокам согласования между участниками процесса.",
    "Ввести ежедневный короткий статус по просроченным согласованиям.",
    "Определить маршрут эскалации при нарушении сроков.",
];

const COUNTER_DEADLINE_KEYS: &[&str] = &["срок", "задерж", "опоздан", "время"];
const COUNTER_DEADLINE: &[&str] = &[
    "Ввести контрольные точки сроков на каждом этапе процесса.",
    "Определить допустимые отклонения и правила приоритизации задач.",
    "Настроить автоматические напоминания по приближению дедлайна.",
    "Проводить еженедельный анализ причин задержек и корректирующие действия.",
];

const COUNTER_GENERIC: &[&str] = &[
    "Утвердить стандарт выполнения процесса с понятными шагами и сроками.",
    "Назначить ответственных по этапам и правилам передачи результата.",
    "Ввести регулярный контроль исполнения и разбор отклонений.",
    "Обновить инструкции и провести обучение участников процесса.",
    "Автоматизировать критичные точки контроля данных и сроков.",
];

pub const STEP2_DEFAULT_HINTS: &[&str] = &[
    "Где и когда проявляется проблема (участок, смена, период)?",
    "Каков масштаб (сколько случаев/рейсов/объектов, как часто)?",
    "Какие последствия для сроков, качества или рентабельности?",
    "Кто конкретно страдает от проблемы (роли/подразделения)?",
    "Какое денежное влияние (убытки, перерасход, упущенная выгода)?",
];

pub const STEP3_HINTS: &[&str] = &[
    "Укажите событие, которое инициирует процесс.",
    "Опишите событие, которое завершает процесс.",
    "Назовите владельца процесса (роль/ответственный).",
    "Опишите периметр: какие подразделения и участки вовлечены.",
    "Перечислите 2–4 метрики результата без чисел.",
];

pub const STEP3_START_EXAMPLES: &[&str] = &[
    "Получение запроса на подготовку ведомостей",
    "Начало отчетного периода по списанию материалов",
];

pub const STEP3_END_EXAMPLES: &[&str] = &[
    "Согласование ведомостей ответственным лицом",
    "Передача ведомостей в бухгалтерию",
];

pub const STEP3_OWNER_EXAMPLES: &[&str] = &[
    "Руководитель участка",
    "Ответственный за материально-техническое обеспечение",
];

pub const STEP3_PERIMETER_EXAMPLES: &[&str] = &[
    "Генеральный директор",
    "Главный инженер",
    "Производственно-технический отдел",
    "Строительная лаборатория",
    "Финансово-экономический отдел",
    "Бухгалтерия",
    "Старший прораб",
    "Отдел главного механика",
    "Отдел главного энергетика",
    "Отдел материально-технического обеспечения",
];

pub const STEP3_METRICS: &[&str] = &[
    "Своевременность предоставления ведомостей",
    "Количество исправлений в ведомостях",
    "Время согласования ведомостей",
    "Процент ведомостей, принятых без доработок",
    "Количество задержек в отчетном периоде",
];

const SUGGESTION_LIMIT: usize = 5;

fn any_key(text: &str, keys: &[&str]) -> bool {
    keys.iter().any(|key| text.contains(key))
}

/// Keyword-matched causes for "why?". Tables accumulate; the generic table
/// applies only when nothing matched.
pub fn why_fallback(effect: &str) -> Vec<String> {
    let lowered = effect.trim().to_lowercase();
    let mut out = Vec::new();
    if any_key(&lowered, WHY_LOGISTICS_KEYS) {
        push_unique(&mut out, WHY_LOGISTICS);
    }
    if any_key(&lowered, WHY_COST_KEYS) {
        push_unique(&mut out, WHY_COST);
    }
    if out.is_empty() {
        push_unique(&mut out, WHY_GENERIC);
    }
    normalize_list(out, SUGGESTION_LIMIT)
}

pub fn countermeasure_fallback(root_cause: &str) -> Vec<String> {
    let lowered = root_cause.to_lowercase();
    let mut out = Vec::new();
    if any_key(&lowered, COUNTER_DATA_KEYS) {
        push_unique(&mut out, COUNTER_DATA);
    }
    if any_key(&lowered, COUNTER_ROLES_KEYS) {
        push_unique(&mut out, COUNTER_ROLES);
    }
    if any_key(&lowered, COUNTER_DEADLINE_KEYS) {
        push_unique(&mut out, COUNTER_DEADLINE);
    }
    if out.is_empty() {
        push_unique(&mut out, COUNTER_GENERIC);
    }
    normalize_list(out, SUGGESTION_LIMIT)
}

pub fn step2_default_hints() -> Vec<String> {
    normalize_list(STEP2_DEFAULT_HINTS, 6)
}

/// Process and project names built from the context boundaries. The first
/// two project names are replaced by metric-based ones when metrics exist.
pub fn naming_fallback(raw_problem: &str, ctx: &ProcessContext) -> ProcessProposals {
    let start = ctx.start_event.trim();
    let end = ctx.end_event.trim();
    let perimeter = ctx.perimeter.trim();

    let mut base = Vec::new();
    if !start.is_empty() && !end.is_empty() {
        base.push(format!("От {start} до {end}"));
    }
    if !perimeter.is_empty() {
        base.push(format!("в контуре {perimeter}"));
    }
    let mut flow = base.join(" ").trim().to_string();
    if flow.is_empty() {
        flow = if raw_problem.trim().is_empty() {
            "ключевого процесса".to_string()
        } else {
            raw_problem.trim().to_string()
        };
    }

    let process_variants = vec![
        format!("Планирование и исполнение процесса {flow}"),
        format!("Координация и контроль процесса {flow}"),
        format!("Организация работ и закрытие цикла {flow}"),
        format!("Сквозной процесс выполнения работ {flow}"),
        format!("Подготовка, исполнение и завершение процесса {flow}"),
    ];
    let mut project_variants = vec![
        format!("Снижение потерь в процессе {flow}"),
        format!("Оптимизация процесса {flow}"),
        "Повышение предсказуемости и управляемости процесса".to_string(),
    ];

    let metric = |idx: usize| {
        ctx.result_metrics
            .get(idx)
            .map(|metric| metric.trim().to_string())
            .filter(|metric| !metric.is_empty())
    };
    if let Some(first) = metric(0) {
        project_variants[0] = format!("Улучшение показателя: {first}");
    }
    if let Some(second) = metric(1) {
        project_variants[1] = format!("Стабилизация показателя: {second}");
    }

    ProcessProposals {
        process_variants,
        project_variants,
    }
}
