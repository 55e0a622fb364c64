use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn run(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_a3coach"))
        .args(args)
        .env("HOME", home)
        .output()
        .expect("run binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn setup_writes_config_state_root_and_step_catalog() {
    let dir = tempdir().expect("tempdir");
    let home = dir.path();

    let output = run(home, &["setup"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.starts_with("setup complete"));
    assert!(text.contains("config_created=true"));
    assert!(text.contains("step_descriptors_installed=7"));
    assert!(text.contains("provider=openai_compatible"));

    let state_root = home.join(".a3coach");
    assert!(state_root.join("config.yaml").is_file());
    assert!(state_root.join("projects").is_dir());
    assert!(state_root.join("active_users").is_dir());
    for step in 1..=7 {
        assert!(state_root.join(format!("steps/step_{step}.json")).is_file());
    }
    assert!(!state_root.join("steps/step_8.json").exists());

    let log = fs::read_to_string(state_root.join("logs/a3coach.log")).expect("runtime log");
    assert!(log.contains("setup.completed"));
}

#[test]
fn setup_is_idempotent_and_keeps_edited_descriptors() {
    let dir = tempdir().expect("tempdir");
    let home = dir.path();
    assert!(run(home, &["setup"]).status.success());

    let step1 = home.join(".a3coach/steps/step_1.json");
    fs::write(&step1, r#"{"title": "Своя формулировка", "instruction": "..."}"#)
        .expect("edit descriptor");

    let output = run(home, &["setup"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("config_created=false"));
    assert!(text.contains("step_descriptors_installed=0"));
    assert!(fs::read_to_string(&step1)
        .expect("read descriptor")
        .contains("Своя формулировка"));
}

#[test]
fn commands_without_config_point_to_setup() {
    let dir = tempdir().expect("tempdir");
    let output = run(dir.path(), &["projects"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("run `a3coach setup` first"));
}

#[test]
fn unknown_verb_fails_and_help_lists_commands() {
    let dir = tempdir().expect("tempdir");
    let output = run(dir.path(), &["launch"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("unknown command `launch`"));

    let output = run(dir.path(), &[]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("chat [--user <id>]"));
}
