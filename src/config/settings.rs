use super::ConfigError;
use crate::runtime::StatePaths;
use crate::shared::ids::validate_identifier_value;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_PROJECT_ID: &str = "A3-0001";
pub const DEFAULT_MODEL: &str = "gpt-5.2";
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    OpenaiCompatible,
    Offline,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenaiCompatible => "openai_compatible",
            Self::Offline => "offline",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub kind: ProviderKind,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    pub state_root: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps_dir: Option<PathBuf>,
    #[serde(default = "default_project_id")]
    pub default_project_id: String,
    #[serde(default = "default_model")]
    pub methodologist_model: String,
    #[serde(default = "default_model")]
    pub review_model: String,
    #[serde(default)]
    pub provider: ProviderSettings,
}

fn default_project_id() -> String {
    DEFAULT_PROJECT_ID.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

impl Settings {
    /// Settings used by `setup` when no config file exists yet.
    pub fn with_state_root(state_root: impl Into<PathBuf>) -> Self {
        Self {
            state_root: state_root.into(),
            steps_dir: None,
            default_project_id: default_project_id(),
            methodologist_model: default_model(),
            review_model: default_model(),
            provider: ProviderSettings::default(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ConfigError::Read {
                path: path.to_path_buf(),
                source,
            },
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.state_root.is_absolute() {
            return Err(ConfigError::Settings(
                "`state_root` must be an absolute path".to_string(),
            ));
        }
        if let Some(steps_dir) = &self.steps_dir {
            if !steps_dir.is_absolute() {
                return Err(ConfigError::Settings(
                    "`steps_dir` must be an absolute path".to_string(),
                ));
            }
        }
        validate_identifier_value("default_project_id", &self.default_project_id)
            .map_err(ConfigError::Settings)?;
        if self.methodologist_model.trim().is_empty() {
            return Err(ConfigError::Settings(
                "`methodologist_model` must be non-empty".to_string(),
            ));
        }
        if self.review_model.trim().is_empty() {
            return Err(ConfigError::Settings(
                "`review_model` must be non-empty".to_string(),
            ));
        }
        if self.provider.kind == ProviderKind::OpenaiCompatible {
            if !self.provider.endpoint.starts_with("http://")
                && !self.provider.endpoint.starts_with("https://")
            {
                return Err(ConfigError::Settings(format!(
                    "`provider.endpoint` must be an http(s) url, got `{}`",
                    self.provider.endpoint
                )));
            }
            if self.provider.api_key_env.trim().is_empty() {
                return Err(ConfigError::Settings(
                    "`provider.api_key_env` must be non-empty".to_string(),
                ));
            }
        }
        if self.provider.timeout_seconds == 0 {
            return Err(ConfigError::Settings(
                "`provider.timeout_seconds` must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn state_paths(&self) -> StatePaths {
        StatePaths::new(&self.state_root).with_steps_dir(self.steps_dir.clone())
    }
}
