//! First-attempt progress reporting.

use serde::{Deserialize, Serialize};

use crate::model::{Phase, QuestionRecord};
use crate::session::QuizSession;

/// Percentage of records that have received a first answer, in `[0, 100]`.
///
/// Review re-answers never move this number: once every record has been
/// attempted it stays at 100.
pub fn percent(records: &[QuestionRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let answered = records.iter().filter(|r| r.is_answered()).count();
    answered as f64 / records.len() as f64 * 100.0
}

/// Aggregated view of session progress, useful for a progress bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
    pub percent: f64,
    pub phase: Phase,
    pub review_round: u32,
}

impl Progress {
    pub fn from_session(session: &QuizSession) -> Self {
        let records = session.records();
        Self {
            answered: records.iter().filter(|r| r.is_answered()).count(),
            total: records.len(),
            percent: percent(records),
            phase: session.phase(),
            review_round: session.review_round(),
        }
    }

    /// A fixed-width text bar such as `[#####-----]`.
    pub fn bar(&self, width: usize) -> String {
        let filled = ((self.percent / 100.0) * width as f64).round() as usize;
        let filled = filled.min(width);
        format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
    }
}
