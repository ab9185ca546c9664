//! CLI integration tests
//!
//! These tests drive the built binary against state documents written to a
//! temporary directory.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_storylens"))
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_diff_text_reports_changes() {
    let dir = TempDir::new().unwrap();
    let old = write(&dir, "old.json", r#"{"gold": 5, "inventory": ["map"]}"#);
    let new = write(&dir, "new.json", r#"{"gold": 7, "inventory": ["map", "sword"], "met_wizard": true}"#);

    let output = run(&["diff", "--old", old.to_str().unwrap(), "--new", new.to_str().unwrap()]);

    assert!(
        output.status.success(),
        "CLI command should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let out = stdout(&output);
    assert!(out.contains("**Changes**: 3"), "unexpected output:\n{}", out);
    assert!(out.contains("`State.gold`: value changed (`5` → `7`)"));
    assert!(out.contains("`State.inventory`: 1 value added to array: `sword`"));
    assert!(out.contains("property added: \"met_wizard\""));
}

#[test]
fn test_diff_json_output_is_parseable() {
    let dir = TempDir::new().unwrap();
    let old = write(&dir, "old.json", r#"{"a": 1, "b": 2, "d": 4}"#);
    let new = write(&dir, "new.json", r#"{"a": 1, "c": 3}"#);

    let output = run(&[
        "diff",
        "--old",
        old.to_str().unwrap(),
        "--new",
        new.to_str().unwrap(),
        "--format",
        "json",
    ]);
    assert!(output.status.success());

    let records: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["change"], "keys_removed");
    assert_eq!(records[0]["keys"], serde_json::json!(["b", "d"]));
    assert_eq!(records[1]["change"], "key_added");
    assert_eq!(records[1]["new_value"], 3);
}

#[test]
fn test_diff_honours_ignore_file() {
    let dir = TempDir::new().unwrap();
    let old = write(&dir, "old.json", r#"{"turns": 1, "hp": 10}"#);
    let new = write(&dir, "new.json", r#"{"turns": 2, "hp": 10}"#);
    let ignore = write(&dir, "ignore.json", r#"["State.turns"]"#);

    let output = run(&[
        "diff",
        "--old",
        old.to_str().unwrap(),
        "--new",
        new.to_str().unwrap(),
        "--ignore",
        ignore.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("_No changes detected._"));
}

#[test]
fn test_diff_config_sets_root_path() {
    let dir = TempDir::new().unwrap();
    let old = write(&dir, "old.json", r#"{"hp": 10}"#);
    let new = write(&dir, "new.json", r#"{"hp": 9}"#);
    let config = write(&dir, "storylens.toml", "root_path = \"vars\"\n");

    for raw in [false, true] {
        let mut args = vec![
            "diff",
            "--old",
            old.to_str().unwrap(),
            "--new",
            new.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ];
        if raw {
            args.push("--raw");
        }
        let output = run(&args);
        assert!(output.status.success());
        assert!(stdout(&output).contains("`vars.hp`: value changed"));
    }
}

#[test]
fn test_diff_rejects_scalar_root() {
    let dir = TempDir::new().unwrap();
    let old = write(&dir, "old.json", "3");
    let new = write(&dir, "new.json", "4");

    let output = run(&["diff", "--old", old.to_str().unwrap(), "--new", new.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("number"));
}

#[test]
fn test_diff_reports_missing_file() {
    let dir = TempDir::new().unwrap();
    let new = write(&dir, "new.json", "{}");
    let missing = dir.path().join("missing.json");

    let output = run(&["diff", "--old", missing.to_str().unwrap(), "--new", new.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot read"));
}

#[test]
fn test_tree_text_lists_paths() {
    let dir = TempDir::new().unwrap();
    let input = write(
        &dir,
        "state.json",
        r#"{"inventory": ["map"], "odd key": {}, "flags": {"$map": [["seen", true]]}}"#,
    );

    let output = run(&["tree", "--input", input.to_str().unwrap()]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.starts_with("State: (properties: 3)\n"), "unexpected output:\n{}", out);
    assert!(out.contains("  State.inventory: (items: 1)\n"));
    assert!(out.contains("    State.inventory[0]: map\n"));
    assert!(out.contains("  State['odd key']: empty object\n"));
    assert!(out.contains("    State.flags.get('seen'): true\n"));
}

#[test]
fn test_tree_json_output() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "state.json", r#"{"hp": 3, "log": [1, 2]}"#);
    let ignore = write(&dir, "ignore.json", r#"["log"]"#);

    let output = run(&[
        "tree",
        "--input",
        input.to_str().unwrap(),
        "--ignore",
        ignore.to_str().unwrap(),
        "--root-path",
        "",
        "--format",
        "json",
    ]);
    assert!(output.status.success());

    let tree: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(tree["kind"], "object");
    assert_eq!(tree["keys"], serde_json::json!(["hp"]));
    assert_eq!(tree["items"][0]["path"], "hp");
    assert_eq!(tree["items"][0]["value"], 3);
}

#[test]
fn test_diff_file_against_itself_with_array_of_objects() {
    let dir = TempDir::new().unwrap();
    let state = write(
        &dir,
        "state.json",
        r#"{"party": [{"name": "Ada", "hp": 3}, {"name": "Bo", "bag": [[1], {"k": 2}]}]}"#,
    );
    let path = state.to_str().unwrap();

    let modes: [&[&str]; 2] = [&[], &["--raw"]];
    for extra in modes {
        let mut args = vec!["diff", "--old", path, "--new", path];
        args.extend_from_slice(extra);
        let output = run(&args);

        assert!(output.status.success());
        let out = stdout(&output);
        assert!(out.contains("**Changes**: 0"), "unexpected output for {:?}:\n{}", extra, out);
        assert!(out.contains("_No changes detected._"));
    }
}

#[test]
fn test_diff_reports_edit_inside_array_element() {
    let dir = TempDir::new().unwrap();
    let old = write(&dir, "old.json", r#"{"party": [{"name": "Ada", "hp": 3}]}"#);
    let new = write(&dir, "new.json", r#"{"party": [{"name": "Ada", "hp": 1}]}"#);

    let modes: [&[&str]; 2] = [&[], &["--raw"]];
    for extra in modes {
        let mut args = vec!["diff", "--old", old.to_str().unwrap(), "--new", new.to_str().unwrap()];
        args.extend_from_slice(extra);
        let output = run(&args);

        assert!(output.status.success());
        let out = stdout(&output);
        assert!(out.contains("**Changes**: 1"), "unexpected output for {:?}:\n{}", extra, out);
        assert!(out.contains("`State.party[0].hp`: value changed (`3` → `1`)"));
    }
}
