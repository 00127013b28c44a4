use assert_cmd::prelude::*;
use predicates::str::contains;
use std::process::Command;

#[test]
fn prints_help() {
    let mut cmd = Command::cargo_bin("pw").unwrap();
    cmd.arg("--help");
    cmd.assert().success().stdout(contains("Step-by-step AI prompt wizard"));
}

#[test]
fn tasks_toggle_requires_index() {
    let mut cmd = Command::cargo_bin("pw").unwrap();
    cmd.args(["tasks", "toggle"]);
    let assert = cmd.assert().failure();
    // clap should error about missing argument
    assert.stderr(contains("Usage:"));
}

#[test]
fn tokens_counts_inline_text() {
    let temp = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("pw").unwrap();
    cmd.current_dir(temp.path())
        .env("XDG_CONFIG_HOME", temp.path().join(".config"))
        .args(["tokens", "hello", "world"]);
    cmd.assert().success().stdout(contains("Tokens: "));
}

#[test]
fn tokens_json_reports_count_and_level() {
    let temp = tempfile::tempdir().unwrap();
    let file = temp.path().join("big.md");
    std::fs::write(&file, "word ".repeat(200)).unwrap();

    let mut cmd = Command::cargo_bin("pw").unwrap();
    cmd.current_dir(temp.path())
        .env("XDG_CONFIG_HOME", temp.path().join(".config"))
        .args(["tokens", "--file", file.to_str().unwrap(), "--json"]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let v: serde_json::Value = serde_json::from_slice(&out).expect("json object");
    assert!(v["tokens"].as_u64().unwrap() >= 100);
    assert_eq!(v["level"], "normal");
    assert_eq!(v["threshold"], 30000);
}

#[test]
fn tokens_threshold_comes_from_config() {
    let temp = tempfile::tempdir().unwrap();
    let config_home = temp.path().join(".config");
    std::fs::create_dir_all(config_home.join("prompt-wizard")).unwrap();
    std::fs::write(config_home.join("prompt-wizard").join("config.toml"), "token_threshold = 3\n").unwrap();

    let mut cmd = Command::cargo_bin("pw").unwrap();
    cmd.current_dir(temp.path())
        .env("XDG_CONFIG_HOME", &config_home)
        .args(["tokens", "--json", "one two three four five six"]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["level"], "high");
}
