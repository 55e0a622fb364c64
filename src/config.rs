pub mod error;
pub mod load;
pub mod paths;
pub mod save;
pub mod settings;

pub use error::ConfigError;
pub use load::load_global_settings;
pub use paths::{
    default_global_config_path, home_directory, GLOBAL_SETTINGS_FILE_NAME, GLOBAL_STATE_DIR,
};
pub use save::save_settings;
pub use settings::{
    ProviderKind, ProviderSettings, Settings, DEFAULT_API_KEY_ENV, DEFAULT_ENDPOINT,
    DEFAULT_MODEL, DEFAULT_PROJECT_ID,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn minimal_settings_fill_defaults() {
        let settings: Settings = serde_yaml::from_str(
            r#"
state_root: /tmp/a3coach
"#,
        )
        .expect("parse settings");

        assert_eq!(settings.default_project_id, "A3-0001");
        assert_eq!(settings.methodologist_model, "gpt-5.2");
        assert_eq!(settings.review_model, "gpt-5.2");
        assert_eq!(settings.provider.kind, ProviderKind::OpenaiCompatible);
        assert_eq!(settings.provider.api_key_env, "OPENAI_API_KEY");
        assert_eq!(settings.provider.timeout_seconds, 60);
        settings.validate().expect("defaults are valid");
    }

    #[test]
    fn steps_dir_override_reaches_state_paths() {
        let settings: Settings = serde_yaml::from_str(
            r#"
state_root: /tmp/a3coach
steps_dir: /srv/a3/steps
provider:
  kind: offline
"#,
        )
        .expect("parse settings");

        let paths = settings.state_paths();
        assert_eq!(paths.steps_dir(), PathBuf::from("/srv/a3/steps"));
        assert_eq!(paths.projects_dir(), PathBuf::from("/tmp/a3coach/projects"));
    }

    #[test]
    fn validation_rejects_relative_state_root() {
        let settings: Settings = serde_yaml::from_str(
            r#"
state_root: relative/state
"#,
        )
        .expect("parse settings");

        let err = settings.validate().expect_err("validation should fail");
        match err {
            ConfigError::Settings(message) => assert!(message.contains("state_root")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn validation_rejects_zero_timeout_and_bad_project_id() {
        let settings: Settings = serde_yaml::from_str(
            r#"
state_root: /tmp/a3coach
provider:
  timeout_seconds: 0
"#,
        )
        .expect("parse settings");
        let err = settings.validate().expect_err("zero timeout must fail");
        assert!(err.to_string().contains("timeout_seconds"));

        let settings: Settings = serde_yaml::from_str(
            r#"
state_root: /tmp/a3coach
default_project_id: "bad id"
"#,
        )
        .expect("parse settings");
        let err = settings.validate().expect_err("bad project id must fail");
        assert!(err.to_string().contains("default_project_id"));
    }

    #[test]
    fn validation_rejects_non_http_endpoint_for_remote_provider() {
        let settings: Settings = serde_yaml::from_str(
            r#"
state_root: /tmp/a3coach
provider:
  kind: openai_compatible
  endpoint: ftp://example.test
"#,
        )
        .expect("parse settings");
        let err = settings.validate().expect_err("endpoint must fail");
        assert!(err.to_string().contains("provider.endpoint"));
    }

    #[test]
    fn unknown_provider_kind_is_a_parse_error() {
        let err = serde_yaml::from_str::<Settings>(
            r#"
state_root: /tmp/a3coach
provider:
  kind: carrier_pigeon
"#,
        )
        .expect_err("invalid provider kind should fail");
        assert!(err.to_string().contains("kind"));
    }

    #[test]
    fn missing_config_file_points_at_setup() {
        let temp = tempdir().expect("temp dir");
        let err = Settings::from_path(&temp.path().join("config.yaml"))
            .expect_err("missing file must fail");
        assert!(matches!(err, ConfigError::NotFound { .. }));
        assert!(err.to_string().contains("run `a3coach setup` first"));
    }

    #[test]
    fn default_global_config_path_targets_home_a3coach_config_yaml() {
        let _guard = ENV_LOCK.lock().expect("env lock");
        let temp = tempdir().expect("temp dir");
        let old_home = std::env::var_os("HOME");
        std::env::set_var("HOME", temp.path());

        let path = default_global_config_path().expect("resolve global config path");
        assert_eq!(path, temp.path().join(".a3coach/config.yaml"));

        if let Some(value) = old_home {
            std::env::set_var("HOME", value);
        } else {
            std::env::remove_var("HOME");
        }
    }

    #[test]
    fn save_then_load_global_settings_round_trips() {
        let _guard = ENV_LOCK.lock().expect("env lock");
        let temp = tempdir().expect("temp dir");
        let old_home = std::env::var_os("HOME");
        std::env::set_var("HOME", temp.path());

        let mut settings = Settings::with_state_root(temp.path().join(".a3coach"));
        settings.methodologist_model = "gpt-4.1".to_string();
        let path = save_settings(&settings).expect("save settings");
        assert!(fs::metadata(&path).is_ok());

        let loaded = load_global_settings().expect("load global settings");
        assert_eq!(loaded, settings);

        if let Some(value) = old_home {
            std::env::set_var("HOME", value);
        } else {
            std::env::remove_var("HOME");
        }
    }
}
