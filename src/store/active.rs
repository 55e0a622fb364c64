use super::{io_error, StoreError};
use crate::runtime::StatePaths;
use crate::shared::fs_atomic::{atomic_write_file, read_utf8_lossless};
use crate::shared::ids::{ProjectId, UserId};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ActiveProjectRecord {
    #[serde(default)]
    project_id: String,
}

/// user id -> active project id, one small JSON file per user.
#[derive(Debug, Clone)]
pub struct ActiveProjectStore {
    paths: StatePaths,
    default_project_id: String,
}

impl ActiveProjectStore {
    pub fn new(paths: StatePaths, default_project_id: impl Into<String>) -> Self {
        Self {
            paths,
            default_project_id: default_project_id.into(),
        }
    }

    /// The user id becomes a file name, so it is validated first.
    fn active_path(&self, user_id: &str) -> Result<PathBuf, StoreError> {
        let user = UserId::parse(user_id).map_err(StoreError::InvalidId)?;
        Ok(self
            .paths
            .active_users_dir()
            .join(format!("{}.json", user.as_str())))
    }

    /// Unknown users, unreadable records and ids that fail validation all
    /// resolve to the default project.
    pub fn get(&self, user_id: &str) -> String {
        self.active_path(user_id)
            .ok()
            .and_then(|path| read_utf8_lossless(&path).ok())
            .and_then(|raw| serde_json::from_str::<ActiveProjectRecord>(&raw).ok())
            .and_then(|record| ProjectId::parse(&record.project_id).ok())
            .map(|project_id| project_id.as_str().to_string())
            .unwrap_or_else(|| self.default_project_id.clone())
    }

    pub fn set(&self, user_id: &str, project_id: &str) -> Result<(), StoreError> {
        let path = self.active_path(user_id)?;
        let project_id = ProjectId::parse(project_id).map_err(StoreError::InvalidId)?;
        let record = ActiveProjectRecord {
            project_id: project_id.as_str().to_string(),
        };
        let body = serde_json::to_vec_pretty(&record).map_err(|source| StoreError::Json {
            path: path.display().to_string(),
            source,
        })?;
        atomic_write_file(&path, &body).map_err(|e| io_error(&path, e))
    }
}
