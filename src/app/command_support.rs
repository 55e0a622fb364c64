use crate::config::{default_global_config_path, ConfigError, Settings};
use crate::orchestrator::Orchestrator;
use crate::provider::{generator_from_settings, TextGenerator};
use crate::runtime::{bootstrap_state_root, StatePaths};
use crate::shared::ids::UserId;

pub const DEFAULT_CHAT_USER: &str = "local";

pub fn map_config_err(err: ConfigError) -> String {
    err.to_string()
}

pub fn load_settings() -> Result<Settings, String> {
    let path = default_global_config_path().map_err(map_config_err)?;
    let settings = Settings::from_path(&path).map_err(map_config_err)?;
    settings.validate().map_err(map_config_err)?;
    Ok(settings)
}

pub fn ensure_runtime_root(settings: &Settings) -> Result<StatePaths, String> {
    let paths = settings.state_paths();
    bootstrap_state_root(&paths).map_err(|e| e.to_string())?;
    Ok(paths)
}

/// Settings, state directories and an orchestrator wired to the configured
/// generator.
pub fn load_orchestrator() -> Result<Orchestrator<Box<dyn TextGenerator>>, String> {
    let settings = load_settings()?;
    ensure_runtime_root(&settings)?;
    let generator = generator_from_settings(&settings);
    Ok(Orchestrator::new(&settings, generator))
}

/// Pulls `--user <id>` out of `args`, defaulting to the local chat user.
pub fn parse_user_flag(args: &[String], usage: &str) -> Result<String, String> {
    match args {
        [] => Ok(DEFAULT_CHAT_USER.to_string()),
        [flag, user] if flag == "--user" => Ok(UserId::parse(user)?.as_str().to_string()),
        _ => Err(format!("usage: {usage}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_flag_defaults_to_local() {
        assert_eq!(parse_user_flag(&[], "chat").expect("default"), "local");
        let args = vec!["--user".to_string(), "anna".to_string()];
        assert_eq!(parse_user_flag(&args, "chat").expect("flag"), "anna");
        let err = parse_user_flag(&["--user".to_string()], "chat [--user <id>]")
            .expect_err("missing value");
        assert_eq!(err, "usage: chat [--user <id>]");
        let bad = vec!["--user".to_string(), "a b".to_string()];
        assert!(parse_user_flag(&bad, "chat").is_err());
    }
}
