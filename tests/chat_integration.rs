use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::tempdir;

fn run(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_a3coach"))
        .args(args)
        .env("HOME", home)
        .output()
        .expect("run binary")
}

fn run_with_stdin(home: &Path, args: &[&str], stdin_body: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_a3coach"))
        .args(args)
        .env("HOME", home)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn a3coach");
    child
        .stdin
        .as_mut()
        .expect("stdin")
        .write_all(stdin_body.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait output")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// `setup`, then switch the provider to offline so no network is needed.
fn offline_home(home: &Path) {
    let output = run(home, &["setup"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    fs::write(
        home.join(".a3coach/config.yaml"),
        format!(
            "state_root: {}\nprovider:\n  kind: offline\n",
            home.join(".a3coach").display()
        ),
    )
    .expect("write offline config");
}

#[test]
fn chat_runs_turns_until_exit() {
    let dir = tempdir().expect("tempdir");
    let home = dir.path();
    offline_home(home);

    let output = run_with_stdin(
        home,
        &["chat"],
        "\nЛимиты на технику согласовываются несвоевременно\n/projects\n/exit\nignored\n",
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.starts_with("chat user=local project=A3-0001"));
    assert!(text.contains("assistant> ✅ Шаг 1 готов."));
    assert!(text.contains("assistant> 📂 Проекты:\n- A3-0001"));
    assert!(text.ends_with("chat ended\nuser=local turns=2\n"));

    let status = stdout(&run(home, &["status"]));
    assert!(status.contains("project=A3-0001"));
    assert!(status.contains("stored=true"));
    assert!(status.contains("step=2"));
    assert!(status.contains("provider=offline"));
}

#[test]
fn send_runs_one_turn_for_a_named_user() {
    let dir = tempdir().expect("tempdir");
    let home = dir.path();
    offline_home(home);

    let output = run(home, &["send", "anna", "/startnew"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).starts_with("🆕 Создан новый проект: 00001"));

    let output = run(
        home,
        &["send", "anna", "Заявки", "на", "технику", "согласовываются", "долго"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).starts_with("✅ Шаг 1 готов."));

    assert_eq!(stdout(&run(home, &["projects"])).trim(), "00001");
    let status = stdout(&run(home, &["status", "--user", "anna"]));
    assert!(status.contains("project=00001"));
    assert!(status.contains("step=2"));

    let output = run(home, &["send", "bad user", "hi"]);
    assert!(!output.status.success());
}

#[test]
fn chat_user_flag_is_validated() {
    let dir = tempdir().expect("tempdir");
    let home = dir.path();
    offline_home(home);

    let output = run_with_stdin(home, &["chat", "--user"], "");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("usage: chat [--user <id>]"));
}
