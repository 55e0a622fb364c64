use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid user id: {0}")]
    InvalidUser(String),
    #[error("failed to map project state for editing: {0}")]
    EditMapping(#[from] serde_json::Error),
}
