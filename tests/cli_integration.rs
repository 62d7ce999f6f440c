//! CLI integration tests for twig
//!
//! These tests drive the binary end to end against a temp task file,
//! verifying that the commands compose: add, nest, complete, reorder,
//! delete with cascade, and the cycle refusal.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command instance pointed at a task file
fn twig_cmd(file: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("twig"));
    cmd.env("TWIG_FILE", file);
    cmd
}

/// Add a task and return its id
fn add_task(file: &Path, content: &str) -> i64 {
    let output = twig_cmd(file)
        .args(["add", content, "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    json["id"].as_i64().unwrap()
}

/// Read the outline as JSON rows
fn outline(file: &Path) -> Vec<serde_json::Value> {
    let output = twig_cmd(file)
        .args(["list", "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    serde_json::from_str(&stdout).unwrap()
}

// =============================================================================
// Add / list
// =============================================================================

#[test]
fn test_add_and_list() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("tasks.json");

    twig_cmd(&file)
        .args(["add", "Buy milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added"));

    twig_cmd(&file)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Buy milk"))
        .stdout(predicate::str::contains("[ ]"));
}

#[test]
fn test_list_empty() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("tasks.json");

    twig_cmd(&file)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks"));
}

#[test]
fn test_add_rejects_empty_content() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("tasks.json");

    twig_cmd(&file).args(["add", "   "]).assert().failure();
}

#[test]
fn test_newest_task_is_listed_first() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("tasks.json");

    let a = add_task(&file, "first");
    let b = add_task(&file, "second");

    let rows = outline(&file);
    assert_eq!(rows[0]["id"].as_i64(), Some(b));
    assert_eq!(rows[1]["id"].as_i64(), Some(a));
}

// =============================================================================
// Storage format
// =============================================================================

#[test]
fn test_task_file_wire_format() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("tasks.json");

    let id = add_task(&file, "Buy milk");

    let raw = fs::read_to_string(&file).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(json[0]["id"].as_i64(), Some(id));
    assert_eq!(json[0]["content"], "Buy milk");
    assert_eq!(json[0]["isCompleted"], false);
    assert_eq!(json[0]["dependsOn"], serde_json::Value::Null);
}

// =============================================================================
// Completion
// =============================================================================

#[test]
fn test_done_toggles() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("tasks.json");

    let id = add_task(&file, "Pay rent");

    twig_cmd(&file)
        .args(["done", &id.to_string()])
        .assert()
        .success();
    twig_cmd(&file)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("[x]"));

    // Toggling again clears the flag
    twig_cmd(&file)
        .args(["done", &id.to_string()])
        .assert()
        .success();
    twig_cmd(&file)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("[ ]"));
}

#[test]
fn test_done_unknown_id_is_not_fatal() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("tasks.json");

    twig_cmd(&file)
        .args(["done", "999"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No task"));
}

#[test]
fn test_invalid_id_is_an_error() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("tasks.json");

    twig_cmd(&file)
        .args(["done", "not-a-number"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid task id"));
}

// =============================================================================
// Dependencies
// =============================================================================

#[test]
fn test_link_nests_child_under_parent() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("tasks.json");

    let parent = add_task(&file, "Buy milk");
    let child = add_task(&file, "Find wallet");

    twig_cmd(&file)
        .args(["link", &child.to_string(), &parent.to_string()])
        .assert()
        .success();

    let rows = outline(&file);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"].as_i64(), Some(parent));
    assert_eq!(rows[0]["level"].as_i64(), Some(0));
    assert_eq!(rows[1]["id"].as_i64(), Some(child));
    assert_eq!(rows[1]["level"].as_i64(), Some(1));
    assert_eq!(rows[1]["dependsOn"].as_i64(), Some(parent));
}

#[test]
fn test_add_under_nests_directly() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("tasks.json");

    let parent = add_task(&file, "Trip");

    twig_cmd(&file)
        .args(["add", "Book flights", "--under", &parent.to_string()])
        .assert()
        .success();

    let rows = outline(&file);
    assert_eq!(rows[1]["content"], "Book flights");
    assert_eq!(rows[1]["level"].as_i64(), Some(1));
}

#[test]
fn test_link_refuses_cycle() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("tasks.json");

    let a = add_task(&file, "A");
    let b = add_task(&file, "B");

    // B depends on A; A -> B must then be refused.
    twig_cmd(&file)
        .args(["link", &b.to_string(), &a.to_string()])
        .assert()
        .success();

    twig_cmd(&file)
        .args(["link", &a.to_string(), &b.to_string()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("circular"));

    // A is still top-level.
    let rows = outline(&file);
    let row_a = rows.iter().find(|r| r["id"].as_i64() == Some(a)).unwrap();
    assert_eq!(row_a["dependsOn"], serde_json::Value::Null);
}

#[test]
fn test_link_refuses_self() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("tasks.json");

    let a = add_task(&file, "A");

    twig_cmd(&file)
        .args(["link", &a.to_string(), &a.to_string()])
        .assert()
        .failure();
}

#[test]
fn test_unlink_restores_top_level() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("tasks.json");

    let parent = add_task(&file, "parent");
    let child = add_task(&file, "child");

    twig_cmd(&file)
        .args(["link", &child.to_string(), &parent.to_string()])
        .assert()
        .success();
    twig_cmd(&file)
        .args(["unlink", &child.to_string()])
        .assert()
        .success();

    let rows = outline(&file);
    assert!(rows.iter().all(|r| r["level"].as_i64() == Some(0)));
}

// =============================================================================
// Delete with cascade
// =============================================================================

#[test]
fn test_rm_cascades_one_level() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("tasks.json");

    let a = add_task(&file, "a");
    let b = add_task(&file, "b");
    let c = add_task(&file, "c");

    twig_cmd(&file)
        .args(["link", &b.to_string(), &a.to_string()])
        .assert()
        .success();
    twig_cmd(&file)
        .args(["link", &c.to_string(), &b.to_string()])
        .assert()
        .success();

    twig_cmd(&file)
        .args(["rm", &a.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("dependent"));

    // a and b are gone; grandchild c survives as a root.
    let rows = outline(&file);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"].as_i64(), Some(c));
    assert_eq!(rows[0]["level"].as_i64(), Some(0));
    assert_eq!(rows[0]["dependsOn"], serde_json::Value::Null);
}

#[test]
fn test_rm_parent_and_only_child_empties_list() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("tasks.json");

    let a = add_task(&file, "Buy milk");
    let b = add_task(&file, "Pay rent");

    twig_cmd(&file)
        .args(["link", &b.to_string(), &a.to_string()])
        .assert()
        .success();
    twig_cmd(&file)
        .args(["rm", &a.to_string()])
        .assert()
        .success();

    assert!(outline(&file).is_empty());
}

// =============================================================================
// Manual order
// =============================================================================

#[test]
fn test_move_before() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("tasks.json");

    // Front-insertion: sequence ends up [a, b, c].
    let c = add_task(&file, "C");
    let b = add_task(&file, "B");
    let a = add_task(&file, "A");

    twig_cmd(&file)
        .args(["move", &c.to_string(), "--before", &b.to_string()])
        .assert()
        .success();

    let rows = outline(&file);
    let order: Vec<i64> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
    assert_eq!(order, vec![a, c, b]);
}

#[test]
fn test_move_to_end() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("tasks.json");

    let b = add_task(&file, "B");
    let a = add_task(&file, "A");

    twig_cmd(&file)
        .args(["move", &a.to_string()])
        .assert()
        .success();

    let rows = outline(&file);
    let order: Vec<i64> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
    assert_eq!(order, vec![b, a]);
}

#[test]
fn test_move_keeps_dependency() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("tasks.json");

    let parent = add_task(&file, "parent");
    let child = add_task(&file, "child");

    twig_cmd(&file)
        .args(["link", &child.to_string(), &parent.to_string()])
        .assert()
        .success();
    twig_cmd(&file)
        .args(["move", &child.to_string()])
        .assert()
        .success();

    let rows = outline(&file);
    let row = rows
        .iter()
        .find(|r| r["id"].as_i64() == Some(child))
        .unwrap();
    assert_eq!(row["dependsOn"].as_i64(), Some(parent));
    assert_eq!(row["level"].as_i64(), Some(1));
}

// =============================================================================
// Degraded storage
// =============================================================================

#[test]
fn test_corrupt_file_degrades_to_empty_list() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("tasks.json");
    fs::write(&file, "not json").unwrap();

    twig_cmd(&file)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks"))
        .stderr(predicate::str::contains("warning"));
}

#[test]
fn test_hand_edited_cycle_still_lists_every_task() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("tasks.json");
    fs::write(
        &file,
        r#"[
            {"id": 1, "content": "a", "isCompleted": false, "dependsOn": 2},
            {"id": 2, "content": "b", "isCompleted": false, "dependsOn": 1},
            {"id": 3, "content": "c", "isCompleted": false, "dependsOn": null}
        ]"#,
    )
    .unwrap();

    let rows = outline(&file);
    assert_eq!(rows.len(), 3);

    // The cycle members come back as roots.
    for id in [1, 2] {
        let row = rows.iter().find(|r| r["id"].as_i64() == Some(id)).unwrap();
        assert_eq!(row["dependsOn"], serde_json::Value::Null);
    }
}

#[test]
fn test_file_flag_overrides_env() {
    let dir = TempDir::new().unwrap();
    let env_file = dir.path().join("env.json");
    let flag_file = dir.path().join("flag.json");

    twig_cmd(&env_file)
        .args(["--file", flag_file.to_str().unwrap(), "add", "hello"])
        .assert()
        .success();

    assert!(flag_file.exists());
    assert!(!env_file.exists());
}
