use super::{default_global_config_path, ConfigError, Settings};
use crate::shared::fs_atomic::atomic_write_file;
use std::path::PathBuf;

/// Validates and writes `settings` to `~/.a3coach/config.yaml`, returning the path.
pub fn save_settings(settings: &Settings) -> Result<PathBuf, ConfigError> {
    settings.validate()?;

    let path = default_global_config_path()?;
    let body = serde_yaml::to_string(settings).map_err(|source| ConfigError::Encode {
        path: path.clone(),
        source,
    })?;
    atomic_write_file(&path, body.as_bytes()).map_err(|source| ConfigError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
