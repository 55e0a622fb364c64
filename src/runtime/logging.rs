use super::StatePaths;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;

#[derive(Serialize)]
struct LogLine<'a> {
    timestamp: String,
    level: &'a str,
    event: &'a str,
    message: &'a str,
}

/// Appends one JSON line to `logs/a3coach.log`. Logging never fails a turn,
/// so every error is dropped.
pub fn append_runtime_log(paths: &StatePaths, level: &str, event: &str, message: &str) {
    let line = LogLine {
        timestamp: chrono::Utc::now().to_rfc3339(),
        level,
        event,
        message,
    };
    let Ok(mut encoded) = serde_json::to_string(&line) else {
        return;
    };
    encoded.push('\n');

    let path = paths.runtime_log_path();
    let dir_ready = path.parent().map_or(true, |dir| fs::create_dir_all(dir).is_ok());
    if !dir_ready {
        return;
    }
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&path) {
        let _ = file.write_all(encoded.as_bytes());
    }
}
