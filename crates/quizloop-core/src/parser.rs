//! CSV quiz loader.
//!
//! Turns raw CSV text into validated [`QuestionRecord`]s. Each row is
//! `question, option, option, ..., correct[, explanation]` with no header.
//! Two row shapes are accepted:
//!
//! - `question, opt1, ..., optN, correct, explanation` when the second-to-last
//!   cell matches one of the options before it, and
//! - `question, opt1, ..., optN, correct` otherwise.
//!
//! Rows that cannot be interpreted are dropped with a warning; the caller
//! only ever sees valid records.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::error::RecordError;
use crate::model::QuestionRecord;

/// Why a CSV row was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowErrorReason {
    #[error("expected at least 3 cells, found {0}")]
    TooFewCells(usize),

    #[error("correct option not found among options")]
    CorrectAnswerNotFound,

    #[error(transparent)]
    InvalidRecord(#[from] RecordError),

    #[error("malformed CSV: {0}")]
    Malformed(String),
}

/// A dropped row and the 1-based line it started on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row {line}: {reason}")]
pub struct RowError {
    pub line: u64,
    pub reason: RowErrorReason,
}

/// Everything the loader found in a source, valid or not.
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    pub records: Vec<QuestionRecord>,
    pub rejected: Vec<RowError>,
}

/// Parse CSV text into question records.
///
/// Returns `Err` with every row error when no row is valid (including empty
/// input). Otherwise dropped rows are logged and the valid records returned.
pub fn parse(raw: &str) -> std::result::Result<Vec<QuestionRecord>, Vec<RowError>> {
    let report = parse_with_report(raw);
    if report.records.is_empty() {
        return Err(report.rejected);
    }
    for row in &report.rejected {
        tracing::warn!("skipping {row}");
    }
    Ok(report.records)
}

/// Parse CSV text, keeping both accepted records and rejected rows.
pub fn parse_with_report(raw: &str) -> ParseReport {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());

    let mut report = ParseReport::default();

    for result in reader.records() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                report.rejected.push(RowError {
                    line,
                    reason: RowErrorReason::Malformed(e.to_string()),
                });
                continue;
            }
        };

        if row.iter().all(str::is_empty) {
            continue;
        }

        let line = row.position().map(|p| p.line()).unwrap_or(0);
        let cells: Vec<&str> = row.iter().collect();
        let id = report.records.len();

        match interpret_row(id, &cells) {
            Ok(record) => report.records.push(record),
            Err(reason) => report.rejected.push(RowError { line, reason }),
        }
    }

    report
}

fn interpret_row(id: usize, cells: &[&str]) -> std::result::Result<QuestionRecord, RowErrorReason> {
    if cells.len() < 3 {
        return Err(RowErrorReason::TooFewCells(cells.len()));
    }

    let question = cells[0];
    let rest = &cells[1..];

    if rest.len() >= 3 {
        let (options, tail) = rest.split_at(rest.len() - 2);
        let (correct, explanation) = (tail[0], tail[1]);
        if let Some(correct_index) = options.iter().position(|o| *o == correct) {
            return Ok(QuestionRecord::new(
                id,
                question,
                to_owned(options),
                correct_index,
                explanation,
            )?);
        }
    }

    let (options, correct) = rest.split_at(rest.len() - 1);
    let correct_index = options
        .iter()
        .position(|o| *o == correct[0])
        .ok_or(RowErrorReason::CorrectAnswerNotFound)?;

    Ok(QuestionRecord::new(
        id,
        question,
        to_owned(options),
        correct_index,
        "",
    )?)
}

fn to_owned(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

/// Read and parse a quiz file.
///
/// Fails when the file cannot be read or contains no valid question.
pub fn parse_quiz_file(path: &Path) -> Result<Vec<QuestionRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;

    parse(&content).map_err(|rejected| {
        anyhow::anyhow!(
            "no valid questions were found in {} ({} row(s) rejected)",
            path.display(),
            rejected.len()
        )
    })
}

/// A warning from quiz validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question id (if applicable).
    pub question_id: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Check accepted records for issues that do not make them invalid.
pub fn validate_quiz(records: &[QuestionRecord]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_questions = HashSet::new();
    for record in records {
        if !seen_questions.insert(record.question()) {
            warnings.push(ValidationWarning {
                question_id: Some(record.id()),
                message: format!("duplicate question: {}", record.question()),
            });
        }
    }

    // The first matching option wins, so a repeated option hides the others.
    for record in records {
        let mut seen_options = HashSet::new();
        if let Some(dup) = record.options().iter().find(|o| !seen_options.insert(*o)) {
            warnings.push(ValidationWarning {
                question_id: Some(record.id()),
                message: format!("option \"{dup}\" appears more than once"),
            });
        }
    }

    for record in records {
        if record.options().iter().any(|o| o.is_empty()) {
            warnings.push(ValidationWarning {
                question_id: Some(record.id()),
                message: "an option is empty".into(),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_CSV: &str = "\
What is the capital of France?,Paris,London,Berlin,Paris,Paris is the capital
2 + 2?,3,4,5,4
Largest planet?,Mars,Jupiter,Jupiter,It is a gas giant
";

    #[test]
    fn parses_both_row_shapes() {
        let records = parse(VALID_CSV).unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].options(), &["Paris", "London", "Berlin"]);
        assert_eq!(records[0].correct_index(), 0);
        assert_eq!(records[0].explanation(), "Paris is the capital");

        assert_eq!(records[1].options(), &["3", "4", "5"]);
        assert_eq!(records[1].correct_index(), 1);
        assert_eq!(records[1].explanation(), "");

        assert_eq!(records[2].options(), &["Mars", "Jupiter"]);
        assert_eq!(records[2].correct_index(), 1);
        assert_eq!(records[2].explanation(), "It is a gas giant");
    }

    #[test]
    fn ids_follow_accepted_rows() {
        let csv = "Q1,a,b,a\nbroken,row\nQ2,a,b,b\n";
        let records = parse(csv).unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn trims_cells_and_skips_blank_lines() {
        let csv = "\n  Q1 ,  yes , no , yes \r\n\n   \nQ2,a,b,b\n";
        let report = parse_with_report(csv);
        assert_eq!(report.records.len(), 2);
        assert!(report.rejected.is_empty());
        assert_eq!(report.records[0].question(), "Q1");
        assert_eq!(report.records[0].options(), &["yes", "no"]);
    }

    #[test]
    fn quoted_cells_may_contain_commas() {
        let csv = "\"Pick one, please\",\"a, b\",c,\"a, b\"\n";
        let records = parse(csv).unwrap();
        assert_eq!(records[0].question(), "Pick one, please");
        assert_eq!(records[0].correct_index(), 0);
    }

    #[test]
    fn rejects_rows_with_reasons() {
        let csv = "\
only,two
Q,a,b,c
Q,a,a
,a,b,a
Q,a,b,a
";
        let report = parse_with_report(csv);
        assert_eq!(report.records.len(), 1);

        let reasons: Vec<_> = report.rejected.iter().map(|e| (e.line, &e.reason)).collect();
        assert_eq!(
            reasons,
            vec![
                (1, &RowErrorReason::TooFewCells(2)),
                (2, &RowErrorReason::CorrectAnswerNotFound),
                (
                    3,
                    &RowErrorReason::InvalidRecord(RecordError::TooFewOptions { count: 1 })
                ),
                (4, &RowErrorReason::InvalidRecord(RecordError::EmptyQuestion)),
            ]
        );
    }

    #[test]
    fn no_valid_rows_is_an_error() {
        assert_eq!(parse(""), Err(vec![]));
        let errors = parse("just,two\n").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "row 1: expected at least 3 cells, found 2");
    }

    #[test]
    fn explanation_shape_needs_matching_answer() {
        // "d" is not an option, so the row falls back to the short shape
        // and "e" must be the answer.
        let records = parse("Q,a,b,d,e\nQ2,a,b,e,e\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].question(), "Q2");
        assert_eq!(records[0].options(), &["a", "b", "e"]);
        assert_eq!(records[0].correct_index(), 2);
    }

    #[test]
    fn validate_flags_duplicates() {
        let records = parse("Q,a,a,b,a\nQ,x,y,x\n").unwrap();
        let warnings = validate_quiz(&records);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate question")));
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("appears more than once")));
    }

    #[test]
    fn parse_file_reports_missing_and_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = parse_quiz_file(&dir.path().join("nope.csv"));
        assert!(missing.is_err());

        let empty = dir.path().join("empty.csv");
        std::fs::write(&empty, "nothing,here\n").unwrap();
        let err = parse_quiz_file(&empty).unwrap_err();
        assert!(err.to_string().contains("no valid questions"));

        let good = dir.path().join("good.csv");
        std::fs::write(&good, VALID_CSV).unwrap();
        assert_eq!(parse_quiz_file(&good).unwrap().len(), 3);
    }
}
