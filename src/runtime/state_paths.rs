use super::RuntimeError;
use std::fs;
use std::path::{Path, PathBuf};

/// Layout of everything the coach keeps on disk under one state root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePaths {
    pub root: PathBuf,
    steps_override: Option<PathBuf>,
}

impl StatePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            steps_override: None,
        }
    }

    pub fn with_steps_dir(mut self, steps_dir: Option<PathBuf>) -> Self {
        self.steps_override = steps_dir;
        self
    }

    pub fn required_directories(&self) -> Vec<PathBuf> {
        vec![
            self.projects_dir(),
            self.active_users_dir(),
            self.steps_dir(),
            self.root.join("logs"),
        ]
    }

    pub fn projects_dir(&self) -> PathBuf {
        self.root.join("projects")
    }

    pub fn active_users_dir(&self) -> PathBuf {
        self.root.join("active_users")
    }

    pub fn steps_dir(&self) -> PathBuf {
        self.steps_override
            .clone()
            .unwrap_or_else(|| self.root.join("steps"))
    }

    pub fn runtime_log_path(&self) -> PathBuf {
        self.root.join("logs/a3coach.log")
    }
}

pub const DEFAULT_STATE_ROOT_DIR: &str = ".a3coach";

pub fn default_state_root_path() -> Result<PathBuf, RuntimeError> {
    let home = std::env::var_os("HOME").ok_or(RuntimeError::HomeDirectoryUnavailable)?;
    Ok(PathBuf::from(home).join(DEFAULT_STATE_ROOT_DIR))
}

pub fn bootstrap_state_root(paths: &StatePaths) -> Result<(), RuntimeError> {
    for dir in paths.required_directories() {
        create_dir(&dir)?;
    }
    Ok(())
}

fn create_dir(path: &Path) -> Result<(), RuntimeError> {
    fs::create_dir_all(path).map_err(|source| RuntimeError::CreateDir {
        path: path.display().to_string(),
        source,
    })
}
