//! Core data model types for quizloop.
//!
//! A `QuestionRecord` carries both the content of one question and the
//! attempt-tracking fields the session fills in as the user answers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RecordError;

/// One multiple-choice question and its answer history.
///
/// Content fields are fixed at construction. Tracking fields are only
/// mutated by [`QuizSession`](crate::session::QuizSession).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    id: usize,
    question: String,
    options: Vec<String>,
    correct_index: usize,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    first_answer_index: Option<usize>,
    #[serde(default)]
    first_answer_correct: Option<bool>,
    #[serde(default)]
    attempts: u32,
    #[serde(default)]
    answered_correctly_at_least_once: bool,
}

impl QuestionRecord {
    /// Create an unanswered record, validating its content.
    pub fn new(
        id: usize,
        question: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
        explanation: impl Into<String>,
    ) -> Result<Self, RecordError> {
        let record = Self {
            id,
            question: question.into(),
            options,
            correct_index,
            explanation: explanation.into(),
            first_answer_index: None,
            first_answer_correct: None,
            attempts: 0,
            answered_correctly_at_least_once: false,
        };
        record.validate()?;
        Ok(record)
    }

    /// Check the content invariants. Records that fail never enter a session.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.question.trim().is_empty() {
            return Err(RecordError::EmptyQuestion);
        }
        if self.options.len() < 2 {
            return Err(RecordError::TooFewOptions {
                count: self.options.len(),
            });
        }
        if self.correct_index >= self.options.len() {
            return Err(RecordError::CorrectIndexOutOfRange {
                index: self.correct_index,
                option_count: self.options.len(),
            });
        }
        Ok(())
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// The option chosen on the very first submission, if any.
    pub fn first_answer_index(&self) -> Option<usize> {
        self.first_answer_index
    }

    pub fn first_answer_correct(&self) -> Option<bool> {
        self.first_answer_correct
    }

    /// Total submissions, including repeats during review.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn answered_correctly_at_least_once(&self) -> bool {
        self.answered_correctly_at_least_once
    }

    pub fn is_answered(&self) -> bool {
        self.first_answer_index.is_some()
    }

    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_index
    }

    /// Record one submission. Returns `true` if it was the first-ever answer.
    pub(crate) fn record_answer(&mut self, selected: usize) -> bool {
        let correct = self.is_correct(selected);
        self.attempts = self.attempts.saturating_add(1);

        let first = self.first_answer_index.is_none();
        if first {
            self.first_answer_index = Some(selected);
            self.first_answer_correct = Some(correct);
        }
        if correct {
            self.answered_correctly_at_least_once = true;
        }
        first
    }

    /// Tracking fields must agree with each other for a resumed record.
    pub(crate) fn tracking_is_consistent(&self) -> bool {
        let first_fields_paired =
            self.first_answer_index.is_some() == self.first_answer_correct.is_some();
        let first_matches = match (self.first_answer_index, self.first_answer_correct) {
            (Some(index), Some(correct)) => {
                index < self.options.len() && self.is_correct(index) == correct
            }
            _ => true,
        };
        let attempts_cover_first = self.first_answer_index.is_none() || self.attempts >= 1;
        let fixed_implies_answered =
            !self.answered_correctly_at_least_once || self.first_answer_index.is_some();

        first_fields_paired && first_matches && attempts_cover_first && fixed_implies_answered
    }
}

/// Which traversal the session is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// First pass through every question in load order.
    Initial,
    /// Repeated passes over questions missed on their first attempt.
    Review,
    /// Terminal.
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Initial => write!(f, "initial"),
            Phase::Review => write!(f, "review"),
            Phase::Done => write!(f, "done"),
        }
    }
}

/// What the presentation layer needs to reveal after a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub question_id: usize,
    pub selected_index: usize,
    pub correct_index: usize,
    pub correct: bool,
    /// Whether this submission was the question's first-ever answer.
    pub first_attempt: bool,
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn new_record_is_unanswered() {
        let record = QuestionRecord::new(0, "2 + 2?", options(&["3", "4"]), 1, "").unwrap();
        assert!(!record.is_answered());
        assert_eq!(record.attempts(), 0);
        assert!(!record.answered_correctly_at_least_once());
    }

    #[test]
    fn rejects_invalid_content() {
        assert_eq!(
            QuestionRecord::new(0, "  ", options(&["a", "b"]), 0, ""),
            Err(RecordError::EmptyQuestion)
        );
        assert_eq!(
            QuestionRecord::new(0, "Q", options(&["a"]), 0, ""),
            Err(RecordError::TooFewOptions { count: 1 })
        );
        assert_eq!(
            QuestionRecord::new(0, "Q", options(&["a", "b"]), 2, ""),
            Err(RecordError::CorrectIndexOutOfRange {
                index: 2,
                option_count: 2
            })
        );
    }

    #[test]
    fn first_answer_is_recorded_once() {
        let mut record = QuestionRecord::new(0, "Q", options(&["a", "b"]), 0, "").unwrap();
        assert!(record.record_answer(1));
        assert!(!record.record_answer(0));

        assert_eq!(record.first_answer_index(), Some(1));
        assert_eq!(record.first_answer_correct(), Some(false));
        assert_eq!(record.attempts(), 2);
        assert!(record.answered_correctly_at_least_once());
        assert!(record.tracking_is_consistent());
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let record = QuestionRecord::new(3, "Q", options(&["a", "b"]), 1, "why").unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["correctIndex"], 1);
        assert_eq!(json["firstAnswerIndex"], serde_json::Value::Null);
        assert_eq!(json["answeredCorrectlyAtLeastOnce"], false);
    }

    #[test]
    fn phase_display() {
        assert_eq!(Phase::Review.to_string(), "review");
        assert_eq!(Phase::Done.to_string(), "done");
    }
}
