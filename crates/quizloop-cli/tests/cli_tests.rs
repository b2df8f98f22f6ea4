//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Runs in `dir` with no user config or overrides leaking in.
fn quizloop(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quizloop").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("QUIZLOOP_CATALOG_URL")
        .env_remove("QUIZLOOP_STATE_DIR")
        .env_remove("RUST_LOG");
    cmd
}

const TWO_QUESTIONS: &str = "Capital of France?,Paris,Rome,Berlin,Paris\n2 + 2?,3,4,5,4\n";

fn write_quiz(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("quiz.csv");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    quizloop(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("review rounds"));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    quizloop(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quizloop"));
}

#[test]
fn play_requires_a_source() {
    let dir = TempDir::new().unwrap();
    quizloop(dir.path()).arg("play").assert().failure();
}

#[test]
fn validate_reports_rejected_rows() {
    let dir = TempDir::new().unwrap();
    let path = write_quiz(
        &dir,
        "Capital of France?,Paris,Rome,Berlin,Paris\nBroken,only\nNo answer?,a,b,c\n",
    );

    quizloop(dir.path())
        .arg("validate")
        .arg("--file")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 questions)"))
        .stdout(predicate::str::contains("[line 2] REJECTED"))
        .stdout(predicate::str::contains("[line 3] REJECTED"))
        .stdout(predicate::str::contains("2 row(s) rejected"));
}

#[test]
fn validate_nonexistent_file() {
    let dir = TempDir::new().unwrap();
    quizloop(dir.path())
        .arg("validate")
        .arg("--file")
        .arg("nonexistent.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    quizloop(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizloop.toml"))
        .stdout(predicate::str::contains("Created quizzes/sample.csv"));

    assert!(dir.path().join("quizloop.toml").exists());
    assert!(dir.path().join("quizzes/quizzes.json").exists());

    quizloop(dir.path())
        .arg("validate")
        .arg("--file")
        .arg("quizzes/sample.csv")
        .assert()
        .success()
        .stdout(predicate::str::contains("(4 questions)"))
        .stdout(predicate::str::contains("All rows valid."));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    quizloop(dir.path()).arg("init").assert().success();

    quizloop(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn list_local_catalog() {
    let dir = TempDir::new().unwrap();
    quizloop(dir.path()).arg("init").assert().success();
    std::fs::write(
        dir.path().join("quizzes/world_capitals.csv"),
        TWO_QUESTIONS,
    )
    .unwrap();

    quizloop(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rust warm-up"))
        .stdout(predicate::str::contains("World capitals"));
}

#[test]
fn play_file_to_completion() {
    let dir = TempDir::new().unwrap();
    let path = write_quiz(&dir, TWO_QUESTIONS);

    // Miss the first question, get the second, fix the first in review.
    quizloop(dir.path())
        .arg("play")
        .arg("--file")
        .arg(&path)
        .arg("--state-dir")
        .arg("state")
        .write_stdin("2\n\n2\n\n1\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Review round 1"))
        .stdout(predicate::str::contains("1 / 2 correct on first try"));

    assert!(dir.path().join("state/quizQuestions.json").exists());

    let output = quizloop(dir.path())
        .arg("results")
        .arg("--format")
        .arg("json")
        .arg("--state-dir")
        .arg("state")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let payload: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(payload["summary"]["totalQuestions"], 2);
    assert_eq!(payload["summary"]["correctOnFirstTry"], 1);
    assert_eq!(payload["summary"]["wrongOnFirstTry"], 1);
    assert_eq!(payload["quizTitle"], "Quiz");

    quizloop(dir.path())
        .arg("results")
        .arg("--format")
        .arg("html")
        .arg("--output")
        .arg("out/results.html")
        .arg("--state-dir")
        .arg("state")
        .assert()
        .success();
    let html = std::fs::read_to_string(dir.path().join("out/results.html")).unwrap();
    assert!(html.contains("1 / 2 correct on first try"));
}

#[test]
fn abandon_and_resume() {
    let dir = TempDir::new().unwrap();
    let path = write_quiz(&dir, TWO_QUESTIONS);

    // Answer the first question wrong, then input ends.
    quizloop(dir.path())
        .arg("play")
        .arg("--file")
        .arg(&path)
        .arg("--state-dir")
        .arg("state")
        .write_stdin("2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("play --resume"));

    quizloop(dir.path())
        .arg("results")
        .arg("--state-dir")
        .arg("state")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no quiz results"));

    // The answered question is not asked again.
    quizloop(dir.path())
        .arg("play")
        .arg("--resume")
        .arg("--state-dir")
        .arg("state")
        .write_stdin("\n2\n\n1\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 2/2"))
        .stdout(predicate::str::contains("Question 1/2").not())
        .stdout(predicate::str::contains("1 / 2 correct on first try"));

    quizloop(dir.path())
        .arg("results")
        .arg("--state-dir")
        .arg("state")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 / 2 correct on first try"));
}

#[test]
fn resume_without_saved_quiz() {
    let dir = TempDir::new().unwrap();
    quizloop(dir.path())
        .arg("play")
        .arg("--resume")
        .arg("--state-dir")
        .arg("state")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no saved quiz"));
}

#[test]
fn play_rejects_quiz_without_valid_rows() {
    let dir = TempDir::new().unwrap();
    let path = write_quiz(&dir, "just,two\nno answer,a,b,c\n");

    quizloop(dir.path())
        .arg("play")
        .arg("--file")
        .arg(&path)
        .arg("--state-dir")
        .arg("state")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no valid questions were found"));

    assert!(!dir.path().join("state/quizQuestions.json").exists());
}

#[test]
fn unknown_results_format() {
    let dir = TempDir::new().unwrap();
    let path = write_quiz(&dir, "Only?,yes,no,yes\n");

    quizloop(dir.path())
        .arg("play")
        .arg("--file")
        .arg(&path)
        .arg("--state-dir")
        .arg("state")
        .write_stdin("1\n\n")
        .assert()
        .success();

    quizloop(dir.path())
        .arg("results")
        .arg("--format")
        .arg("pdf")
        .arg("--state-dir")
        .arg("state")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}
