mod support;

use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;

use support::TestHome;

#[test]
fn status_transitions_round_trip() {
    let home = TestHome::new();
    home.cmd().args(["add", "write report"]).assert().success();

    home.cmd()
        .args(["pending", "1"])
        .assert()
        .success()
        .stdout(contains("Task 1 marked as pending."));
    assert!(home.read_data().contains("\"pending\": true"));

    home.cmd()
        .args(["hold", "1"])
        .assert()
        .success()
        .stdout(contains("Task 1 put on hold."));
    let raw = home.read_data();
    assert!(raw.contains("\"hold\": true"));
    assert!(raw.contains("\"pending\": false"));

    home.cmd()
        .args(["complete", "1"])
        .assert()
        .success()
        .stdout(contains("Task 1 marked as complete."));
    let raw = home.read_data();
    assert!(raw.contains("\"done\": true"));
    assert!(raw.contains("\"hold\": false"));
}

#[test]
fn done_tasks_hide_until_all() {
    let home = TestHome::new();
    home.cmd().args(["add", "write report"]).assert().success();
    home.cmd().args(["add", "file taxes"]).assert().success();
    home.cmd().args(["complete", "1"]).assert().success();

    home.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("file taxes").and(contains("write report").not()));

    home.cmd()
        .args(["list", "--all"])
        .assert()
        .success()
        .stdout(contains("write report").and(contains("✓ done")));
}

#[test]
fn completion_is_blocked_by_open_subtasks() {
    let home = TestHome::new();
    home.cmd().args(["add", "release"]).assert().success();
    home.cmd()
        .args(["subtask", "1", "write changelog"])
        .assert()
        .success();
    home.cmd().args(["subtask", "1", "tag build"]).assert().success();

    home.cmd()
        .args(["complete", "1"])
        .assert()
        .failure()
        .code(3)
        .stderr(contains("Cannot complete task 1: 2 incomplete subtask(s)"));

    // Status must be untouched by the failed attempt
    assert!(home.read_data().contains("\"done\": false"));

    home.cmd().args(["complete", "1-1"]).assert().success();
    home.cmd().args(["complete", "1-2"]).assert().success();
    home.cmd()
        .args(["complete", "1"])
        .assert()
        .success()
        .stdout(contains("Task 1 marked as complete."));
}

#[test]
fn subtask_completion_is_never_blocked() {
    let home = TestHome::new();
    home.cmd().args(["add", "release"]).assert().success();
    home.cmd().args(["subtask", "1", "step"]).assert().success();

    home.cmd()
        .args(["complete", "1-1"])
        .assert()
        .success()
        .stdout(contains("Task 1-1 marked as complete."));
}

#[test]
fn done_tasks_can_reopen() {
    let home = TestHome::new();
    home.cmd().args(["add", "write report"]).assert().success();
    home.cmd().args(["complete", "1"]).assert().success();

    home.cmd()
        .args(["pending", "1"])
        .assert()
        .success()
        .stdout(contains("Task 1 marked as pending."));

    let raw = home.read_data();
    assert!(raw.contains("\"pending\": true"));
    assert!(raw.contains("\"done\": false"));
}

#[test]
fn missing_targets_exit_2() {
    let home = TestHome::new();
    home.cmd().args(["add", "only one"]).assert().success();

    home.cmd()
        .args(["pending", "9"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Task not found: 9"));

    home.cmd()
        .args(["hold", "1-3"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Task not found: 1-3"));
}

#[test]
fn malformed_ids_exit_2() {
    let home = TestHome::new();

    home.cmd()
        .args(["complete", "abc"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("invalid task id"));
}

#[test]
fn json_error_envelope_carries_kind_and_details() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();
    home.cmd().args(["add", "release"]).assert().success();
    home.cmd().args(["subtask", "1", "step"]).assert().success();

    let output = home.cmd().args(["complete", "1", "--json"]).output()?;
    assert_eq!(output.status.code(), Some(3));

    let value: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["schema_version"], "todo.v1");
    assert_eq!(value["command"], "complete");
    assert_eq!(value["status"], "error");
    assert_eq!(value["kind"], "policy_blocked");
    assert_eq!(value["error"]["code"], 3);
    assert_eq!(value["error"]["details"]["incomplete_subtasks"], 1);

    let output = home.cmd().args(["pending", "9", "--json"]).output()?;
    assert_eq!(output.status.code(), Some(2));

    let value: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["kind"], "user_error");
    assert_eq!(value["error"]["code"], 2);
    Ok(())
}
