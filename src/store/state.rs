use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Methodology step. Persisted as its number; anything past the last
/// implemented step reads as [`Step::Complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum Step {
    #[default]
    RawProblem,
    ProblemSpec,
    Process,
    CurrentMetrics,
    TargetMetrics,
    RootCauses,
    Countermeasures,
    Complete,
}

impl Step {
    pub fn number(self) -> u32 {
        match self {
            Self::RawProblem => 1,
            Self::ProblemSpec => 2,
            Self::Process => 3,
            Self::CurrentMetrics => 4,
            Self::TargetMetrics => 5,
            Self::RootCauses => 6,
            Self::Countermeasures => 7,
            Self::Complete => 8,
        }
    }

    pub fn raw_key(self) -> String {
        format!("step_{}", self.number())
    }
}

impl From<u32> for Step {
    fn from(value: u32) -> Self {
        match value {
            0 | 1 => Self::RawProblem,
            2 => Self::ProblemSpec,
            3 => Self::Process,
            4 => Self::CurrentMetrics,
            5 => Self::TargetMetrics,
            6 => Self::RootCauses,
            7 => Self::Countermeasures,
            _ => Self::Complete,
        }
    }
}

impl From<Step> for u32 {
    fn from(value: Step) -> Self {
        value.number()
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step3Phase {
    #[default]
    Context,
    Proposal,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step4Phase {
    #[default]
    Proposal,
    Values,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step6Phase {
    #[default]
    SelectProblem,
    WhyLoop,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step7Phase {
    #[default]
    Countermeasures,
    Plan,
    Done,
}

macro_rules! phase_str {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }
    };
}

phase_str!(Step3Phase { Context => "context", Proposal => "proposal", Done => "done" });
phase_str!(Step4Phase { Proposal => "proposal", Values => "values", Done => "done" });
phase_str!(Step6Phase { SelectProblem => "select_problem", WhyLoop => "why_loop", Done => "done" });
phase_str!(Step7Phase { Countermeasures => "countermeasures", Plan => "plan", Done => "done" });

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectMeta {
    pub step3_phase: Step3Phase,
    pub step4_phase: Step4Phase,
    pub step6_phase: Step6Phase,
    pub step7_phase: Step7Phase,
    pub edit_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawProblem {
    pub raw_problem_sentence: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemSpec {
    pub where_when: String,
    pub scale: String,
    pub consequences: String,
    pub who_suffers: String,
    pub money_impact: String,
}

impl ProblemSpec {
    pub const KEYS: [&'static str; 5] = [
        "where_when",
        "scale",
        "consequences",
        "who_suffers",
        "money_impact",
    ];

    pub fn values(&self) -> [&str; 5] {
        [
            &self.where_when,
            &self.scale,
            &self.consequences,
            &self.who_suffers,
            &self.money_impact,
        ]
    }

    pub fn slot_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "where_when" => Some(&mut self.where_when),
            "scale" => Some(&mut self.scale),
            "consequences" => Some(&mut self.consequences),
            "who_suffers" => Some(&mut self.who_suffers),
            "money_impact" => Some(&mut self.money_impact),
            _ => None,
        }
    }

    /// Non-empty incoming values overwrite; empty ones never erase.
    pub fn merge_from(&mut self, incoming: &ProblemSpec) {
        for (key, value) in Self::KEYS.iter().zip(incoming.values()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            if let Some(slot) = self.slot_mut(key) {
                *slot = value.to_string();
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values().iter().all(|value| value.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessContext {
    pub start_event: String,
    pub end_event: String,
    pub owner: String,
    pub perimeter: String,
    pub result_metrics: Vec<String>,
}

impl ProcessContext {
    /// Scalars merge when non-empty; metrics are replaced only by a non-empty list.
    pub fn merge_from(&mut self, incoming: &ProcessContext) {
        for (slot, value) in [
            (&mut self.start_event, &incoming.start_event),
            (&mut self.end_event, &incoming.end_event),
            (&mut self.owner, &incoming.owner),
            (&mut self.perimeter, &incoming.perimeter),
        ] {
            let value = value.trim();
            if !value.is_empty() {
                *slot = value.to_string();
            }
        }
        let metrics = crate::shared::text::normalize_list(&incoming.result_metrics, usize::MAX);
        if !metrics.is_empty() {
            self.result_metrics = metrics;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_event.trim().is_empty()
            && self.end_event.trim().is_empty()
            && self.owner.trim().is_empty()
            && self.perimeter.trim().is_empty()
            && self.result_metrics.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessProposals {
    pub process_variants: Vec<String>,
    pub project_variants: Vec<String>,
}

impl ProcessProposals {
    pub fn is_empty(&self) -> bool {
        self.process_variants.is_empty() && self.project_variants.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessDefinition {
    pub process_name: String,
    pub project_title: String,
    pub notes: String,
}

impl ProcessDefinition {
    pub fn is_empty(&self) -> bool {
        self.process_name.trim().is_empty() && self.project_title.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricProposals {
    pub metric_suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentMetric {
    pub metric: String,
    pub current_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetMetric {
    pub metric: String,
    pub target_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WhyEntry {
    pub level: u32,
    pub effect: String,
    pub question: String,
    pub answer: String,
    pub classification: String,
    pub controllable: String,
    pub eliminates_problem: String,
    pub evidence: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RootCause {
    pub problem: String,
    pub root_cause: String,
    #[serde(rename = "type")]
    pub cause_type: String,
    pub process_point: String,
    pub controllable: String,
    pub change_hint: String,
    pub linked_chain_level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Countermeasure {
    pub root_cause: String,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanItem {
    pub action: String,
    pub expected_result: String,
    pub owner: String,
    pub due: String,
}

impl PlanItem {
    pub fn has_owner(&self) -> bool {
        !self.owner.trim().is_empty()
    }

    pub fn has_due(&self) -> bool {
        !self.due.trim().is_empty()
    }
}

/// Named payloads collected across the steps.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StepsData {
    pub raw_problem: RawProblem,
    pub problem_spec: ProblemSpec,
    pub process_context: ProcessContext,
    pub process_proposals: ProcessProposals,
    pub process_definition: ProcessDefinition,
    pub current_state_metric_proposals: MetricProposals,
    pub current_state_metrics: Vec<CurrentMetric>,
    pub target_state_metrics: Vec<TargetMetric>,

    pub step6_problem_pool: Vec<String>,
    pub step6_selected_problems: Vec<String>,
    pub step6_pending_problems: Vec<String>,
    pub step6_active_problem: String,
    pub step6_why_chain: Vec<WhyEntry>,
    pub step6_chains_by_problem: BTreeMap<String, Vec<WhyEntry>>,
    pub step6_why_suggestions: Vec<String>,
    pub root_causes: Vec<RootCause>,

    pub step7_pending_root_causes: Vec<String>,
    pub step7_active_root_cause: String,
    pub step7_suggestions_by_root: BTreeMap<String, Vec<String>>,
    pub step7_llm_raw: String,
    pub step7_llm_error: String,
    pub step7_countermeasures: Vec<Countermeasure>,
    pub step7_selected_actions: Vec<String>,
    pub step7_plan: Vec<PlanItem>,
}

impl StepsData {
    pub fn raw_problem_text(&self) -> &str {
        self.raw_problem.raw_problem_sentence.trim()
    }

    pub fn root_cause_texts(&self) -> Vec<String> {
        self.root_causes
            .iter()
            .map(|rc| rc.root_cause.trim().to_string())
            .filter(|text| !text.is_empty())
            .collect()
    }

    pub fn root_causes_for(&self, problem: &str) -> usize {
        self.root_causes
            .iter()
            .filter(|rc| rc.problem == problem)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectData {
    pub raw: BTreeMap<String, String>,
    pub steps: StepsData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectState {
    pub project_id: String,
    #[serde(default)]
    pub current_step: Step,
    #[serde(default)]
    pub meta: ProjectMeta,
    #[serde(default)]
    pub data: ProjectData,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl ProjectState {
    pub fn skeleton(project_id: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            current_step: Step::RawProblem,
            meta: ProjectMeta::default(),
            data: ProjectData::default(),
            created_at: 0,
            updated_at: 0,
        }
    }

    pub fn steps(&self) -> &StepsData {
        &self.data.steps
    }

    pub fn steps_mut(&mut self) -> &mut StepsData {
        &mut self.data.steps
    }

    pub fn record_raw(&mut self, text: &str) {
        self.data
            .raw
            .insert(self.current_step.raw_key(), text.to_string());
    }
}
