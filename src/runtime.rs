pub mod logging;
pub mod state_paths;

pub use logging::append_runtime_log;
pub use state_paths::{
    bootstrap_state_root, default_state_root_path, StatePaths, DEFAULT_STATE_ROOT_DIR,
};

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("failed to create runtime path {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to resolve home directory for runtime state root")]
    HomeDirectoryUnavailable,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn bootstrap_creates_required_directories() {
        let dir = tempdir().expect("temp dir");
        let paths = StatePaths::new(dir.path().join("state"));
        bootstrap_state_root(&paths).expect("bootstrap succeeds");

        for required in paths.required_directories() {
            assert!(
                required.is_dir(),
                "missing directory: {}",
                required.display()
            );
        }
    }

    #[test]
    fn steps_dir_override_replaces_default_location() {
        let dir = tempdir().expect("temp dir");
        let custom = dir.path().join("catalog");
        let paths = StatePaths::new(dir.path().join("state")).with_steps_dir(Some(custom.clone()));
        assert_eq!(paths.steps_dir(), custom);
    }

    #[test]
    fn runtime_log_appends_json_lines() {
        let dir = tempdir().expect("temp dir");
        let paths = StatePaths::new(dir.path());
        append_runtime_log(&paths, "info", "turn.received", "first");
        append_runtime_log(&paths, "warn", "state.recovered", "second");

        let raw = fs::read_to_string(paths.runtime_log_path()).expect("read log");
        let lines: Vec<serde_json::Value> = raw
            .lines()
            .map(|line| serde_json::from_str(line).expect("json line"))
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "turn.received");
        assert_eq!(lines[1]["level"], "warn");
        assert!(lines[1]["timestamp"].as_str().is_some());
    }
}
