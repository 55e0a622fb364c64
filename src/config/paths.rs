use crate::config::ConfigError;
use std::path::PathBuf;

pub const GLOBAL_STATE_DIR: &str = ".a3coach";
pub const GLOBAL_SETTINGS_FILE_NAME: &str = "config.yaml";

pub fn home_directory() -> Result<PathBuf, ConfigError> {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .ok_or(ConfigError::HomeDirectoryUnavailable)
}

pub fn default_global_config_path() -> Result<PathBuf, ConfigError> {
    Ok(home_directory()?
        .join(GLOBAL_STATE_DIR)
        .join(GLOBAL_SETTINGS_FILE_NAME))
}
