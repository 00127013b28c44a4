use assert_cmd::prelude::*;
use predicates::str::contains;
use std::fs;
use std::path::Path;
use std::process::Command;

fn pw(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pw").unwrap();
    cmd.current_dir(home)
        .env("XDG_DATA_HOME", home.join(".local/share"))
        .env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

fn state_file(home: &Path) -> std::path::PathBuf {
    home.join(".local/share").join("prompt-wizard").join("wizard_state.json")
}

#[test]
fn set_get_show_round_trip() {
    let temp = tempfile::tempdir().unwrap();

    pw(temp.path()).args(["state", "set", "idea", "A habit tracker"]).assert().success().stdout(contains("saved idea"));
    pw(temp.path()).args(["state", "get", "idea"]).assert().success().stdout(contains("A habit tracker"));

    let out = pw(temp.path()).args(["state", "show", "--json"]).assert().success().get_output().stdout.clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["idea"], "A habit tracker");
    assert_eq!(v["currentStep"], "idea");
    assert_eq!(v["codeGenPromptType"], "standard");

    let blob: serde_json::Value = serde_json::from_str(&fs::read_to_string(state_file(temp.path())).unwrap()).unwrap();
    assert!(blob.get("savedAt").is_some());
}

#[test]
fn set_reads_stdin() {
    let temp = tempfile::tempdir().unwrap();
    assert_cmd::Command::from_std(pw(temp.path()))
        .args(["state", "set", "frameworkDocs"])
        .write_stdin("docs from stdin\n")
        .assert()
        .success();
    pw(temp.path()).args(["state", "get", "framework-docs"]).assert().success().stdout(contains("docs from stdin"));
}

#[test]
fn loads_blob_written_by_older_versions() {
    let temp = tempfile::tempdir().unwrap();
    let path = state_file(temp.path());
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, r#"{"currentStep":"specPrompt","idea":"old idea","aiApiKey":null}"#).unwrap();

    pw(temp.path()).args(["step", "show"]).assert().success().stdout(contains("step: specPrompt (6/9)"));
    pw(temp.path()).args(["state", "get", "idea"]).assert().success().stdout(contains("old idea"));
}

#[test]
fn step_navigation_persists() {
    let temp = tempfile::tempdir().unwrap();

    pw(temp.path())
        .args(["step", "prev"])
        .assert()
        .success()
        .stdout(contains("step: idea (1/9)"))
        .stderr(contains("already at the first step"));
    pw(temp.path()).args(["step", "next"]).assert().success().stdout(contains("step: projectRules (2/9)"));
    pw(temp.path())
        .args(["step", "goto", "planner-prompt"])
        .assert()
        .success()
        .stdout(contains("template: prompt3.md"))
        .stdout(contains("answer: plannerPromptOutput (empty)"));

    let out = pw(temp.path()).args(["step", "show", "--json"]).assert().success().get_output().stdout.clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["step"], "plannerPrompt");
    assert_eq!(v["position"], 7);
    assert_eq!(v["answered"], false);
}

#[test]
fn codegen_step_uses_starter_template_and_variant() {
    let temp = tempfile::tempdir().unwrap();

    pw(temp.path()).args(["state", "set", "starterTemplate", "starter code"]).assert().success();
    let out = pw(temp.path())
        .args(["state", "codegen-type", "advanced", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["codeGenPromptType"], "advanced");
    assert_eq!(v["template"], "prompt4b.md");
    pw(temp.path())
        .args(["step", "goto", "codeGenPrompt"])
        .assert()
        .success()
        .stdout(contains("template: prompt4b.md"));
    pw(temp.path()).args(["state", "get", "existingCode"]).assert().success().stdout(contains("starter code"));
}

#[test]
fn reset_requires_confirmation() {
    let temp = tempfile::tempdir().unwrap();
    pw(temp.path()).args(["state", "set", "idea", "keep me"]).assert().success();

    pw(temp.path()).args(["state", "reset"]).assert().failure().stderr(contains("approval required"));
    assert!(state_file(temp.path()).exists());

    pw(temp.path()).args(["state", "reset", "--yes"]).assert().success().stdout(contains("all data has been reset"));
    assert!(!state_file(temp.path()).exists());
    pw(temp.path()).args(["state", "get", "idea"]).assert().success().stdout("\n");
}

fn configure_defaults(home: &Path) {
    let rules = home.join("rules.md");
    let starter = home.join("starter.md");
    fs::write(&rules, "Use Rust 2024.\n").unwrap();
    fs::write(&starter, "fn main() {}\n").unwrap();
    let starter_url = format!("file://{}", starter.display());
    pw(home)
        .args([
            "init",
            "--project-rules-default",
            rules.to_str().unwrap(),
            "--starter-template-default",
            starter_url.as_str(),
        ])
        .assert()
        .success();
}

#[test]
fn load_default_replaces_field() {
    let temp = tempfile::tempdir().unwrap();
    configure_defaults(temp.path());

    pw(temp.path()).args(["state", "set", "projectRules", "old rules"]).assert().success();
    pw(temp.path())
        .args(["state", "load-default", "project-rules"])
        .assert()
        .success()
        .stdout(contains("loaded default projectRules"));
    pw(temp.path()).args(["state", "get", "projectRules"]).assert().success().stdout("Use Rust 2024.\n\n");
}

#[test]
fn entering_empty_steps_loads_defaults() {
    let temp = tempfile::tempdir().unwrap();
    configure_defaults(temp.path());

    pw(temp.path()).args(["step", "next"]).assert().success().stdout(contains("answer: projectRules (filled)"));
    pw(temp.path()).args(["state", "get", "projectRules"]).assert().success().stdout(contains("Use Rust 2024."));

    pw(temp.path()).args(["state", "set", "starterTemplate", "my own starter"]).assert().success();
    pw(temp.path()).args(["step", "goto", "starterTemplate"]).assert().success();
    pw(temp.path()).args(["state", "get", "starterTemplate"]).assert().success().stdout("my own starter\n");
}

#[test]
fn unreachable_default_does_not_block_navigation() {
    let temp = tempfile::tempdir().unwrap();
    pw(temp.path())
        .args(["init", "--project-rules-default", temp.path().join("missing.md").to_str().unwrap()])
        .assert()
        .success();

    pw(temp.path()).args(["step", "next"]).assert().success().stdout(contains("answer: projectRules (empty)"));
}

#[test]
fn reset_keeps_configured_defaults() {
    let temp = tempfile::tempdir().unwrap();
    configure_defaults(temp.path());
    pw(temp.path()).args(["state", "load-default", "starterTemplate"]).assert().success();

    pw(temp.path()).args(["state", "reset", "--yes"]).assert().success();
    pw(temp.path()).args(["state", "get", "starterTemplate"]).assert().success().stdout("\n");

    let cfg = fs::read_to_string(temp.path().join(".config/prompt-wizard/config.toml")).unwrap();
    assert!(cfg.contains("project_rules_default_url"));
    assert!(cfg.contains("starter_template_default_url"));
    pw(temp.path()).args(["state", "load-default", "starterTemplate"]).assert().success();
    pw(temp.path()).args(["state", "get", "starterTemplate"]).assert().success().stdout("fn main() {}\n\n");
}
