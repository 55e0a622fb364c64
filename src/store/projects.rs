use super::{io_error, ProjectState, StoreError};
use crate::runtime::{append_runtime_log, StatePaths};
use crate::shared::fs_atomic::{atomic_write_file, read_utf8_lossless};
use crate::shared::now_secs;
use crate::shared::text::cached_regex;
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::OnceLock;

/// One pretty JSON document per project under `<state_root>/projects`.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    paths: StatePaths,
}

impl ProjectStore {
    pub fn new(paths: StatePaths) -> Self {
        Self { paths }
    }

    pub fn state_path(&self, project_id: &str) -> PathBuf {
        self.paths.projects_dir().join(format!("{project_id}.json"))
    }

    pub fn exists(&self, project_id: &str) -> bool {
        self.state_path(project_id).is_file()
    }

    /// Missing records read as the skeleton. Unreadable or malformed records
    /// are logged and replaced by the skeleton as well.
    pub fn load(&self, project_id: &str) -> ProjectState {
        let path = self.state_path(project_id);
        let raw = match read_utf8_lossless(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return ProjectState::skeleton(project_id)
            }
            Err(err) => {
                append_runtime_log(
                    &self.paths,
                    "warn",
                    "state.recovered",
                    &format!("project={project_id} unreadable: {err}"),
                );
                return ProjectState::skeleton(project_id);
            }
        };

        match serde_json::from_str::<ProjectState>(&raw) {
            Ok(mut state) => {
                if state.project_id.trim().is_empty() {
                    state.project_id = project_id.to_string();
                }
                state
            }
            Err(err) => {
                append_runtime_log(
                    &self.paths,
                    "warn",
                    "state.recovered",
                    &format!("project={project_id} malformed: {err}"),
                );
                ProjectState::skeleton(project_id)
            }
        }
    }

    pub fn save(&self, state: &mut ProjectState) -> Result<(), StoreError> {
        let now = now_secs();
        if state.created_at == 0 {
            state.created_at = now;
        }
        state.updated_at = now;

        let path = self.state_path(&state.project_id);
        let body = serde_json::to_vec_pretty(state).map_err(|source| StoreError::Json {
            path: path.display().to_string(),
            source,
        })?;
        atomic_write_file(&path, &body).map_err(|e| io_error(&path, e))?;
        append_runtime_log(
            &self.paths,
            "info",
            "state.persisted",
            &format!(
                "project={} step={}",
                state.project_id, state.current_step
            ),
        );
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let dir = self.paths.projects_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(io_error(&dir, err)),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_error(&dir, e))?;
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Highest trailing number among existing ids plus one, zero padded to 5.
    pub fn next_project_id(&self) -> Result<String, StoreError> {
        static TRAILING_DIGITS: OnceLock<Option<Regex>> = OnceLock::new();
        let mut max_num: u64 = 0;
        if let Some(re) = cached_regex(&TRAILING_DIGITS, r"(\d+)$") {
            for id in self.list()? {
                let Some(caps) = re.captures(&id) else {
                    continue;
                };
                if let Ok(num) = caps[1].parse::<u64>() {
                    max_num = max_num.max(num);
                }
            }
        }
        Ok(format!("{:05}", max_num + 1))
    }
}
