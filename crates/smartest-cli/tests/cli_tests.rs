//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const QUESTIONS: &str = "../../sheets/ai-midterm.txt";
const KEY: &str = "../../sheets/ai-midterm-key.txt";
const RESPONSES: &str = "../../sheets/ai-midterm-responses.txt";

fn smartest() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("smartest").unwrap()
}

#[test]
fn evaluate_numeric_answer() {
    smartest()
        .arg("evaluate")
        .arg("--reference")
        .arg("Există 92 de soluții")
        .arg("--answer")
        .arg("There are 92 solutions")
        .assert()
        .success()
        .stdout(predicate::str::contains("Shape: numeric"))
        .stdout(predicate::str::contains("Score:"));
}

#[test]
fn evaluate_json_output() {
    let output = smartest()
        .arg("evaluate")
        .arg("--reference")
        .arg("(Jos, Stânga)")
        .arg("--answer")
        .arg("(Down, Left)")
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["score"], 100);
    assert_eq!(json["shape"]["shape"], "structured");
    assert_eq!(json["shape"]["kind"], "tuple");
}

#[test]
fn evaluate_with_topic_keywords() {
    smartest()
        .arg("evaluate")
        .arg("--reference")
        .arg("Backtracking cu Forward Checking")
        .arg("--answer")
        .arg("backtracking with fc")
        .arg("--topic")
        .arg("n-queens")
        .assert()
        .success()
        .stdout(predicate::str::contains("Matched: backtracking"))
        .stdout(predicate::str::contains("Shape: textual"));
}

#[test]
fn evaluate_unknown_topic_fails() {
    smartest()
        .arg("evaluate")
        .arg("--reference")
        .arg("Backtracking")
        .arg("--answer")
        .arg("backtracking")
        .arg("--topic")
        .arg("sudoku")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown topic"));
}

#[test]
fn evaluate_blank_reference_fails() {
    smartest()
        .arg("evaluate")
        .arg("--reference")
        .arg("   ")
        .arg("--answer")
        .arg("anything")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn evaluate_missing_config_fails() {
    smartest()
        .arg("evaluate")
        .arg("--reference")
        .arg("Da")
        .arg("--answer")
        .arg("Da")
        .arg("--config")
        .arg("/nonexistent/smartest.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn topics_lists_catalog() {
    smartest()
        .arg("topics")
        .assert()
        .success()
        .stdout(predicate::str::contains("n-queens"))
        .stdout(predicate::str::contains("Nash Equilibrium (Game Theory)"))
        .stdout(predicate::str::contains("warnsdorff"));
}

#[test]
fn validate_sample_sheets() {
    smartest()
        .arg("validate")
        .arg("--questions")
        .arg(QUESTIONS)
        .arg("--key")
        .arg(KEY)
        .assert()
        .success()
        .stdout(predicate::str::contains("6 questions"))
        .stdout(predicate::str::contains("Sheets valid."));
}

#[test]
fn validate_nonexistent_sheet() {
    smartest()
        .arg("validate")
        .arg("--questions")
        .arg("nonexistent.txt")
        .arg("--key")
        .arg(KEY)
        .assert()
        .failure();
}

#[test]
fn grade_writes_reports() {
    let dir = TempDir::new().unwrap();

    smartest()
        .arg("grade")
        .arg("--questions")
        .arg(QUESTIONS)
        .arg("--key")
        .arg(KEY)
        .arg("--responses")
        .arg(RESPONSES)
        .arg("--output")
        .arg(dir.path())
        .arg("--format")
        .arg("all")
        .assert()
        .success()
        .stdout(predicate::str::contains("Graded 6 of 6 questions"));

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(names.iter().any(|n| n.ends_with(".json")));
    assert!(names.iter().any(|n| n.ends_with(".html")));
    assert!(names.iter().any(|n| n.ends_with(".md")));
}

#[test]
fn compare_report_with_itself() {
    let dir = TempDir::new().unwrap();

    smartest()
        .arg("grade")
        .arg("--questions")
        .arg(QUESTIONS)
        .arg("--key")
        .arg(KEY)
        .arg("--responses")
        .arg(RESPONSES)
        .arg("--output")
        .arg(dir.path())
        .assert()
        .success();

    let report = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .find(|p| p.extension().is_some_and(|e| e == "json"))
        .unwrap();

    smartest()
        .arg("compare")
        .arg("--baseline")
        .arg(&report)
        .arg("--current")
        .arg(&report)
        .arg("--fail-on-regression")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 regressions"))
        .stdout(predicate::str::contains("6 unchanged"));
}

#[test]
fn init_then_grade() {
    let dir = TempDir::new().unwrap();

    smartest()
        .arg("init")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created smartest.toml"));

    assert!(dir.path().join("smartest.toml").exists());
    assert!(dir.path().join("sheets/example-questions.txt").exists());

    smartest()
        .arg("init")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists, skipping"));

    smartest()
        .arg("grade")
        .arg("--questions")
        .arg("sheets/example-questions.txt")
        .arg("--key")
        .arg("sheets/example-key.txt")
        .arg("--responses")
        .arg("sheets/example-responses.txt")
        .arg("--format")
        .arg("text")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Graded 5 of 5 questions"));
}

#[test]
fn help_lists_subcommands() {
    smartest()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("evaluate"))
        .stdout(predicate::str::contains("grade"))
        .stdout(predicate::str::contains("compare"));
}
