//! Integration tests for the clarify CLI
//!
//! These tests drive the compiled binary end to end: renaming runs, exit
//! codes, configuration handling and evaluation output.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Test helper to get the CLI binary
fn clarify_cmd() -> Command {
    Command::cargo_bin("clarify").unwrap()
}

fn copy_fixture(name: &str, into: &Path) {
    let source = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/java")
        .join(name);
    fs::copy(source, into.join(name)).unwrap();
}

#[test]
fn help_lists_subcommands() {
    clarify_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("eval"))
        .stdout(predicate::str::contains("validate-config"));
}

#[test]
fn run_renames_files_and_writes_reports() {
    let input = tempdir().unwrap();
    let out = tempdir().unwrap();
    copy_fixture("Calculator_ESTest.java", input.path());
    copy_fixture("Totals.java", input.path());

    clarify_cmd()
        .arg("run")
        .arg(input.path())
        .arg("--out")
        .arg(out.path())
        .arg("--quiet")
        .assert()
        .code(0);

    let renamed = fs::read_to_string(out.path().join("Calculator_ESTest.java")).unwrap();
    assert!(renamed.contains("int sum = calculator.add(2, 3);"));

    let report: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(out.path().join("Calculator_ESTest.java.renames.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(report["verification"], "structural");
    assert!(!report["entries"].as_array().unwrap().is_empty());

    let untouched = fs::read_to_string(out.path().join("Totals.java")).unwrap();
    let original = fs::read_to_string(input.path().join("Totals.java")).unwrap();
    assert_eq!(untouched, original);
}

#[test]
fn failed_files_give_exit_code_one_and_other_files_still_land() {
    let input = tempdir().unwrap();
    let out = tempdir().unwrap();
    copy_fixture("Calculator_ESTest.java", input.path());
    fs::write(input.path().join("Broken.java"), "class Broken { void m( { }").unwrap();

    clarify_cmd()
        .arg("run")
        .arg(input.path())
        .arg("-o")
        .arg(out.path())
        .arg("--quiet")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Broken.java"))
        .stderr(predicate::str::contains("parse"));

    assert!(out.path().join("Calculator_ESTest.java").exists());
    assert!(!out.path().join("Broken.java").exists());
}

#[test]
fn existing_outputs_need_force() {
    let input = tempdir().unwrap();
    let out = tempdir().unwrap();
    copy_fixture("Totals.java", input.path());
    fs::write(out.path().join("Totals.java"), "stale").unwrap();

    let run = |force: bool| {
        let mut cmd = clarify_cmd();
        cmd.arg("run")
            .arg(input.path().join("Totals.java"))
            .arg("--out")
            .arg(out.path())
            .arg("--quiet");
        if force {
            cmd.arg("--force");
        }
        cmd.assert()
    };

    run(false)
        .failure()
        .stderr(predicate::str::contains("already exists"));
    run(true).success();
    assert_ne!(fs::read_to_string(out.path().join("Totals.java")).unwrap(), "stale");
}

#[test]
fn snake_case_flag_changes_generated_names() {
    let input = tempdir().unwrap();
    let out = tempdir().unwrap();
    copy_fixture("Calculator_ESTest.java", input.path());

    clarify_cmd()
        .args(["run", "--naming-style", "snake-case", "--no-verify", "--quiet", "--out"])
        .arg(out.path())
        .arg(input.path().join("Calculator_ESTest.java"))
        .assert()
        .success();

    let renamed = fs::read_to_string(out.path().join("Calculator_ESTest.java")).unwrap();
    assert!(renamed.contains("test_addition_of_two_numbers"));
}

#[test]
fn non_java_inputs_are_rejected() {
    let input = tempdir().unwrap();
    let out = tempdir().unwrap();
    let notes = input.path().join("notes.txt");
    fs::write(&notes, "hello").unwrap();

    clarify_cmd()
        .arg("run")
        .arg(&notes)
        .arg("--out")
        .arg(out.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a .java file"));
}

#[test]
fn print_default_config_emits_yaml() {
    clarify_cmd()
        .arg("print-default-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("naming_style: camel_case"))
        .stdout(predicate::str::contains("suffix_bound:"))
        .stdout(predicate::str::contains("reserved_words:"));
}

#[test]
fn validate_config_accepts_and_rejects() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("good.yml");
    fs::write(&good, "naming_style: snake_case\nworkers: 2\n").unwrap();
    clarify_cmd()
        .arg("validate-config")
        .arg(&good)
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));

    let bad = dir.path().join("bad.yml");
    fs::write(&bad, "workers: 0\n").unwrap();
    clarify_cmd()
        .arg("validate-config")
        .arg(&bad)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("validation failed"));
}

#[test]
fn eval_reports_json_metrics() {
    let dir = tempdir().unwrap();
    let oracle = dir.path().join("oracle");
    let prediction = dir.path().join("prediction");
    fs::create_dir_all(&oracle).unwrap();
    fs::create_dir_all(&prediction).unwrap();
    copy_fixture("Totals.java", &oracle);
    copy_fixture("Totals.java", &prediction);

    let output = clarify_cmd()
        .args(["eval", "--json", "--oracle"])
        .arg(&oracle)
        .arg("--prediction")
        .arg(&prediction)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["pairs"].as_array().unwrap().len(), 1);
    assert_eq!(report["pairs"][0]["name"], "Totals.java");
    assert_eq!(report["pairs"][0]["cer"], 0.0);
    assert_eq!(report["average"]["f1"], 1.0);
}
