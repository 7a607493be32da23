//! End-to-end tests that run the `dayplan` binary.

use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn dayplan(config_home: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dayplan"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("DAYPLAN_ENDPOINT")
        .env_remove("DAYPLAN_BACKEND")
        .env_remove("DAYPLAN_API_KEY")
        .stdin(Stdio::null())
        .output()
        .expect("failed to run dayplan binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn offline_plan_prints_sequential_schedule() {
    let home = TempDir::new().unwrap();
    let output = dayplan(
        &home,
        &[
            "plan",
            "--offline",
            "--tasks",
            "gym: 1h, write report: 2h, call friend",
            "--range",
            "8 AM–6 PM",
        ],
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        stdout(&output),
        "8:00 AM - 9:00 AM: gym\n9:00 AM - 11:00 AM: write report\n11:00 AM - 11:30 AM: call friend\n"
    );
}

#[test]
fn empty_stdin_reports_missing_input() {
    let home = TempDir::new().unwrap();
    let output = dayplan(&home, &["plan", "--offline"]);
    assert!(output.status.success());
    assert!(
        stdout(&output).contains("Error: Please provide both tasks and a time range."),
        "stdout: {}",
        stdout(&output)
    );
}

#[test]
fn infeasible_plan_exits_non_zero() {
    let home = TempDir::new().unwrap();
    let output = dayplan(
        &home,
        &[
            "plan",
            "--offline",
            "--tasks",
            "project: 5h, project review: 5h",
            "--range",
            "9 AM–5 PM",
        ],
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).starts_with("Error: total task duration (10h) exceeds available time (8h)"));
}

#[test]
fn unreachable_service_falls_back_when_asked() {
    let home = TempDir::new().unwrap();
    let output = dayplan(
        &home,
        &[
            "--endpoint",
            "http://127.0.0.1:1",
            "plan",
            "--fallback-on-error",
            "--tasks",
            "gym: 1h",
            "--range",
            "8 AM-6 PM",
        ],
    );
    assert!(output.status.success());
    assert_eq!(stdout(&output), "8:00 AM - 9:00 AM: gym\n");
}

#[test]
fn tasks_command_shows_normalization() {
    let home = TempDir::new().unwrap();
    let output = dayplan(&home, &["tasks", "gym: 1h, call friend, laundry"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "gym: 1h (explicit)\ncall friend: 0.5h (inferred, short)\nlaundry: 1h (inferred, default)\ntotal: 2.5h\n"
    );
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let home = TempDir::new().unwrap();
    let first = dayplan(&home, &["init"]);
    assert!(first.status.success());
    assert!(home.path().join("dayplan/config.toml").exists());

    let second = dayplan(&home, &["init"]);
    assert!(!second.status.success());
    assert!(String::from_utf8_lossy(&second.stderr).contains("--force"));

    let forced = dayplan(&home, &["init", "--force"]);
    assert!(forced.status.success());
}
