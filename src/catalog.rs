use crate::runtime::{append_runtime_log, StatePaths};
use crate::shared::fs_atomic::read_utf8_lossless;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepDescriptor {
    #[serde(default)]
    pub step_id: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub instruction: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid step descriptor {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only `step_N.json` descriptors. A missing or malformed descriptor is
/// an absent step, never an error for the caller.
#[derive(Debug, Clone)]
pub struct StepCatalog {
    paths: StatePaths,
}

impl StepCatalog {
    pub fn new(paths: StatePaths) -> Self {
        Self { paths }
    }

    pub fn descriptor_path(&self, step: u32) -> PathBuf {
        self.paths.steps_dir().join(format!("step_{step}.json"))
    }

    pub fn exists(&self, step: u32) -> bool {
        self.descriptor_path(step).is_file()
    }

    pub fn load(&self, step: u32) -> Result<StepDescriptor, CatalogError> {
        let path = self.descriptor_path(step);
        let raw = read_utf8_lossless(&path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut descriptor: StepDescriptor =
            serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        if descriptor.step_id == 0 {
            descriptor.step_id = step;
        }
        Ok(descriptor)
    }

    pub fn get(&self, step: u32) -> Option<StepDescriptor> {
        match self.load(step) {
            Ok(descriptor) => Some(descriptor),
            Err(err) => {
                append_runtime_log(&self.paths, "warn", "catalog.missing", &err.to_string());
                None
            }
        }
    }
}
