#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn todo_cmd(data_dir: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("todo"));
    cmd.env_remove("TODO_BACKEND")
        .env_remove("TODO_FILE")
        .env_remove("TODO_NAMESPACE")
        .env_remove("TODO_REDIS_URL")
        .env_remove("RUST_LOG")
        .arg("--data")
        .arg(data_dir);
    cmd
}

/// Adds a todo and returns its generated id.
fn add(data_dir: &Path, backend: &str, data: &str) -> String {
    let output = todo_cmd(data_dir)
        .args(["--backend", backend, "--json", "add", data])
        .output()
        .unwrap();
    assert!(output.status.success(), "{:?}", output);
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    value["affected"][0]["id"].as_str().unwrap().to_string()
}

#[test]
fn test_empty_list() {
    let temp = TempDir::new().unwrap();
    todo_cmd(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No todos."));
    assert!(temp.path().join("todo.json").exists());
}

#[test]
fn test_add_and_list_json_backend() {
    let temp = TempDir::new().unwrap();
    todo_cmd(temp.path())
        .args(["add", "buy milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added todo"));

    todo_cmd(temp.path())
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[ ]").and(predicate::str::contains("buy milk")));

    let raw = fs::read_to_string(temp.path().join("todo.json")).unwrap();
    assert!(raw.contains(r#""data":"buy milk","status":"TODO""#), "{}", raw);
}

#[test]
fn test_text_backend_workflow() {
    let temp = TempDir::new().unwrap();
    let id = add(temp.path(), "text", "call: the bank");

    todo_cmd(temp.path())
        .args(["--backend", "text", "status", &id, "done"])
        .assert()
        .success()
        .stdout(predicate::str::contains("as DONE"));

    todo_cmd(temp.path())
        .args(["--backend", "text", "list", "--status", "done"])
        .assert()
        .success()
        .stdout(predicate::str::contains("call: the bank"));

    let raw = fs::read_to_string(temp.path().join("todo.text")).unwrap();
    assert_eq!(raw, format!("{}: call%3A the bank: DONE", id));

    todo_cmd(temp.path())
        .args(["--backend", "text", "rm", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed todo"));

    todo_cmd(temp.path())
        .args(["--backend", "text", "get", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("todo not found"));
}

#[test]
fn test_update_replaces_data() {
    let temp = TempDir::new().unwrap();
    let id = add(temp.path(), "jsonmap", "draft");

    todo_cmd(temp.path())
        .args(["--backend", "jsonmap", "update", &id, "final"])
        .assert()
        .success();

    todo_cmd(temp.path())
        .args(["--backend", "jsonmap", "get", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("final").and(predicate::str::contains("status: TODO")));
}

#[test]
fn test_invalid_status_is_rejected() {
    let temp = TempDir::new().unwrap();
    let id = add(temp.path(), "json", "keep me");

    todo_cmd(temp.path())
        .args(["status", &id, "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid status"));

    todo_cmd(temp.path())
        .args(["list", "--status", "done"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No todos."));
}

#[test]
fn test_config_file_selects_backend() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("todo.toml"),
        "backend = \"jsonmap\"\nfile = \"mine.json\"\n",
    )
    .unwrap();

    todo_cmd(temp.path())
        .args(["add", "from config"])
        .assert()
        .success();

    let raw = fs::read_to_string(temp.path().join("mine.json")).unwrap();
    assert!(raw.starts_with('{'), "{}", raw);
    assert!(raw.contains("from config"));
    assert!(!temp.path().join("todo.json").exists());
}

#[test]
fn test_env_selects_backend() {
    let temp = TempDir::new().unwrap();
    todo_cmd(temp.path())
        .env("TODO_BACKEND", "text")
        .args(["add", "from env"])
        .assert()
        .success();

    assert!(temp.path().join("todo.text").exists());
}

#[test]
fn test_remote_backend_reports_unreachable_server() {
    let temp = TempDir::new().unwrap();
    todo_cmd(temp.path())
        .env("TODO_REDIS_URL", "redis://127.0.0.1:1")
        .args(["--backend", "remote", "add", "nowhere to go"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unavailable"));

    todo_cmd(temp.path())
        .args([
            "--backend",
            "remote",
            "--redis-url",
            "redis://127.0.0.1:1",
            "list",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unavailable"));
}

#[test]
fn test_unknown_backend_fails() {
    let temp = TempDir::new().unwrap();
    todo_cmd(temp.path())
        .args(["--backend", "sqlite", "list"])
        .assert()
        .failure();
}
