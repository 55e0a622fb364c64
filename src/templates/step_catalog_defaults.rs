use crate::catalog::StepDescriptor;
use crate::shared::fs_atomic::atomic_write_file;
use std::path::{Path, PathBuf};

const DEFAULT_STEPS: [(u32, &str, &str); 7] = [
    (
        1,
        "Сырая проблема",
        "Опиши проблему одним предложением так, как она проявляется сейчас (симптом).\n\
Без причин и без решений: не пиши, что нужно автоматизировать, внедрить или улучшить.",
    ),
    (
        2,
        "Конкретизация проблемы",
        "Уточни проблему по пяти измерениям: где и когда она проявляется, каков масштаб, \
какие последствия, кто от неё страдает и какое денежное влияние (хотя бы оценочно).",
    ),
    (
        3,
        "Процесс, в котором существует проблема",
        "Зафиксируй границы процесса: событие начала и событие окончания, владельца процесса, \
периметр (кто участвует) и 2–4 метрики результата без чисел.",
    ),
    (
        4,
        "Текущее состояние: показатели проблемы",
        "Выбери 2–5 показателей, по которым видно, что проблема существует, \
и укажи их текущие значения.",
    ),
    (
        5,
        "Целевое состояние: показатели, которых хотим добиться",
        "Укажи целевые значения по каждой метрике текущего состояния.",
    ),
    (
        6,
        "Анализ коренных причин (5 Почему)",
        "Выбери проблемы для анализа и последовательно отвечай на вопрос «Почему?», \
пока не дойдёшь до причины, на которую можно повлиять.",
    ),
    (
        7,
        "Контрмеры и план улучшений",
        "Для каждой корневой причины выбери контрмеры, затем собери план: мероприятие, \
ожидаемый результат, ответственный и срок.",
    ),
];

pub fn default_step_descriptors() -> Vec<StepDescriptor> {
    DEFAULT_STEPS
        .iter()
        .map(|(step_id, title, instruction)| StepDescriptor {
            step_id: *step_id,
            title: (*title).to_string(),
            instruction: (*instruction).to_string(),
        })
        .collect()
}

/// Writes the built-in descriptors into `steps_dir`, leaving any existing
/// `step_N.json` untouched. Returns the files that were created.
pub fn install_default_step_catalog(steps_dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut created = Vec::new();
    for descriptor in default_step_descriptors() {
        let path = steps_dir.join(format!("step_{}.json", descriptor.step_id));
        if path.exists() {
            continue;
        }
        let body = serde_json::to_vec_pretty(&descriptor).map_err(std::io::Error::other)?;
        atomic_write_file(&path, &body)?;
        created.push(path);
    }
    Ok(created)
}
