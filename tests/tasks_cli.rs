use assert_cmd::prelude::*;
use predicates::str::contains;
use std::fs;
use std::path::Path;
use std::process::Command;

const PLAN: &str = "# Plan\n\n- [ ] Set up project\n  - [X] Write schema\nNotes stay here.\n- [ ]   Add tests\n";

fn pw(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pw").unwrap();
    cmd.current_dir(home)
        .env("XDG_DATA_HOME", home.join(".local/share"))
        .env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

#[test]
fn list_tasks_from_file_json() {
    let temp = tempfile::tempdir().unwrap();
    let file = temp.path().join("plan.md");
    fs::write(&file, PLAN).unwrap();

    let out = pw(temp.path())
        .args(["tasks", "list", "--file", file.to_str().unwrap(), "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).expect("json array");
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), 3);
    assert_eq!(arr[1]["title"], "Write schema");
    assert_eq!(arr[1]["isChecked"], true);
    assert_eq!(arr[2]["title"], "Add tests");
    assert_eq!(arr[0]["startIndex"], 8);
    assert_eq!(arr[0]["originalLine"], "- [ ] Set up project");
    assert!(arr[0].get("start_index").is_none());
}

#[test]
fn toggle_rewrites_file() {
    let temp = tempfile::tempdir().unwrap();
    let file = temp.path().join("plan.md");
    fs::write(&file, PLAN).unwrap();

    pw(temp.path())
        .args(["tasks", "toggle", "--file", file.to_str().unwrap(), "--index", "0", "--index", "1", "--index", "2"])
        .assert()
        .success()
        .stdout(contains("2/3 done"));

    let after = fs::read_to_string(&file).unwrap();
    assert_eq!(
        after,
        "# Plan\n\n-   [X] Set up project\n  -   [ ] Write schema\nNotes stay here.\n-   [X] Add tests\n"
    );
}

#[test]
fn dry_run_leaves_file_alone() {
    let temp = tempfile::tempdir().unwrap();
    let file = temp.path().join("plan.md");
    fs::write(&file, PLAN).unwrap();

    pw(temp.path())
        .args(["tasks", "toggle", "--file", file.to_str().unwrap(), "--index", "2", "--dry-run"])
        .assert()
        .success()
        .stdout(contains("-   [X] Add tests"));
    assert_eq!(fs::read_to_string(&file).unwrap(), PLAN);
}

#[test]
fn toggle_updates_saved_plan() {
    let temp = tempfile::tempdir().unwrap();
    let file = temp.path().join("plan.md");
    fs::write(&file, PLAN).unwrap();

    pw(temp.path())
        .args(["state", "set", "plannerPromptOutput", "--file", file.to_str().unwrap()])
        .assert()
        .success();
    pw(temp.path()).args(["tasks", "toggle", "--index", "0"]).assert().success();

    pw(temp.path())
        .args(["state", "get", "plannerPromptOutput"])
        .assert()
        .success()
        .stdout(contains("-   [X] Set up project"));

    let state_file = temp.path().join(".local/share/prompt-wizard/wizard_state.json");
    let blob: serde_json::Value = serde_json::from_str(&fs::read_to_string(state_file).unwrap()).unwrap();
    assert!(blob["plannerPromptOutput"].as_str().unwrap().contains("Notes stay here."));
}

#[test]
fn unknown_index_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let file = temp.path().join("plan.md");
    fs::write(&file, PLAN).unwrap();

    pw(temp.path())
        .args(["tasks", "toggle", "--file", file.to_str().unwrap(), "--index", "9"])
        .assert()
        .failure()
        .stderr(contains("invalid task index 9"));
    assert_eq!(fs::read_to_string(&file).unwrap(), PLAN);
}

#[test]
fn no_tasks_message() {
    let temp = tempfile::tempdir().unwrap();
    let file = temp.path().join("notes.md");
    fs::write(&file, "- [x] lowercase is not a task\n").unwrap();

    pw(temp.path())
        .args(["tasks", "list", "--file", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("no tasks found"));
}

#[test]
fn check_and_uncheck_set_explicit_states() {
    let temp = tempfile::tempdir().unwrap();
    let file = temp.path().join("plan.md");
    fs::write(&file, PLAN).unwrap();

    pw(temp.path())
        .args(["tasks", "check", "--file", file.to_str().unwrap(), "--index", "1", "--index", "2"])
        .assert()
        .success()
        .stdout(contains("2/3 done"));
    let after = fs::read_to_string(&file).unwrap();
    assert!(after.contains("  -   [X] Write schema"));
    assert!(after.contains("-   [X] Add tests"));

    pw(temp.path())
        .args(["tasks", "uncheck", "--file", file.to_str().unwrap(), "--index", "1", "--index", "1"])
        .assert()
        .success()
        .stdout(contains("1/3 done"));
    assert!(fs::read_to_string(&file).unwrap().contains("  -   [ ] Write schema"));
}
