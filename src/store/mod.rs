pub mod active;
pub mod projects;
pub mod state;

pub use active::ActiveProjectStore;
pub use projects::ProjectStore;
pub use state::{
    Countermeasure, CurrentMetric, MetricProposals, PlanItem, ProblemSpec, ProcessContext,
    ProcessDefinition, ProcessProposals, ProjectMeta, ProjectState, RawProblem, RootCause, Step,
    Step3Phase, Step4Phase, Step6Phase, Step7Phase, StepsData, TargetMetric, WhyEntry,
};

use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode json for {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("rejected identifier: {0}")]
    InvalidId(String),
}

pub(crate) fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}
