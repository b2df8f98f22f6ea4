//! Final score report for a finished quiz.

use serde::{Deserialize, Serialize};

use crate::model::QuestionRecord;

/// Immutable score report built once the session is done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub total_questions: usize,
    pub correct_on_first_try: usize,
    pub wrong_on_first_try: usize,
    /// One entry per question, in load order.
    pub question_summaries: Vec<QuestionSummary>,
}

/// How a single question went on its first attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSummary {
    pub id: usize,
    pub question: String,
    pub first_answer_index: Option<usize>,
    pub first_answer_correct: bool,
    pub correct_index: usize,
}

impl QuizSummary {
    /// Score a set of records by first-attempt correctness.
    ///
    /// A record that was never answered counts as wrong.
    pub fn from_records(records: &[QuestionRecord]) -> Self {
        let total_questions = records.len();
        let correct_on_first_try = records
            .iter()
            .filter(|r| r.first_answer_correct() == Some(true))
            .count();

        let question_summaries = records
            .iter()
            .map(|r| QuestionSummary {
                id: r.id(),
                question: r.question().to_string(),
                first_answer_index: r.first_answer_index(),
                first_answer_correct: r.first_answer_correct().unwrap_or(false),
                correct_index: r.correct_index(),
            })
            .collect();

        Self {
            total_questions,
            correct_on_first_try,
            wrong_on_first_try: total_questions - correct_on_first_try,
            question_summaries,
        }
    }

    /// First-try score as a percentage, 0 for an empty quiz.
    pub fn score_percent(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        self.correct_on_first_try as f64 / self.total_questions as f64 * 100.0
    }

    pub fn headline(&self) -> String {
        format!(
            "{} / {} correct on first try",
            self.correct_on_first_try, self.total_questions
        )
    }

    /// Questions that were missed on the first attempt.
    pub fn missed(&self) -> impl Iterator<Item = &QuestionSummary> {
        self.question_summaries
            .iter()
            .filter(|q| !q.first_answer_correct)
    }
}
