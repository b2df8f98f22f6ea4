//! The `quizloop validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizloop_core::parser::{parse_with_report, validate_quiz};

pub fn execute(path: PathBuf) -> Result<()> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;
    let report = parse_with_report(&content);

    println!(
        "Quiz: {} ({} questions)",
        path.display(),
        report.records.len()
    );

    for row in &report.rejected {
        println!("  [line {}] REJECTED: {}", row.line, row.reason);
    }

    let warnings = validate_quiz(&report.records);
    for w in &warnings {
        let prefix = w
            .question_id
            .map(|id| format!("  [question {}]", id + 1))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if report.records.is_empty() {
        anyhow::bail!("no valid questions were found in {}", path.display());
    }

    if report.rejected.is_empty() && warnings.is_empty() {
        println!("All rows valid.");
    } else {
        println!(
            "\n{} row(s) rejected, {} warning(s).",
            report.rejected.len(),
            warnings.len()
        );
    }

    Ok(())
}
