//! The quiz session state machine.
//!
//! A session walks every question once in load order (the initial pass),
//! then keeps cycling through the questions missed on their first attempt
//! (review rounds) until each has been answered correctly at least once.
//!
//! ```text
//!  Initial ──end, no misses──────────────────────────► Done
//!     │                                                 ▲
//!     └─end, misses─► Review ──end, all fixed───────────┘
//!                      │  ▲
//!                      └──┘ end, some unfixed (new round)
//! ```
//!
//! Submitting an answer and moving on are separate calls: the presentation
//! layer reveals feedback between them and must not call [`QuizSession::advance`]
//! until the current question has received a submission.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SnapshotError};
use crate::model::{AnswerOutcome, Phase, QuestionRecord};
use crate::progress::{self, Progress};
use crate::summary::QuizSummary;

/// A single quiz attempt over a fixed set of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSession {
    records: Vec<QuestionRecord>,
    phase: Phase,
    initial_order: Vec<usize>,
    wrong_indices: Vec<usize>,
    review_queue: Vec<usize>,
    remaining_to_fix: BTreeSet<usize>,
    current_index: usize,
    answered_current: bool,
    review_round: u32,
}

impl QuizSession {
    /// Start a session in the initial phase at the first question.
    pub fn new(records: Vec<QuestionRecord>) -> Self {
        let initial_order = (0..records.len()).collect();
        tracing::debug!(questions = records.len(), "quiz session created");
        Self {
            records,
            phase: Phase::Initial,
            initial_order,
            wrong_indices: Vec::new(),
            review_queue: Vec::new(),
            remaining_to_fix: BTreeSet::new(),
            current_index: 0,
            answered_current: false,
            review_round: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    pub fn total_questions(&self) -> usize {
        self.records.len()
    }

    /// Record indices missed on their first attempt, in the order they were missed.
    pub fn wrong_indices(&self) -> &[usize] {
        &self.wrong_indices
    }

    pub fn review_queue(&self) -> &[usize] {
        &self.review_queue
    }

    /// Record indices still waiting for a correct answer during review.
    pub fn remaining_to_fix(&self) -> &BTreeSet<usize> {
        &self.remaining_to_fix
    }

    /// Cursor into the active sequence.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// 1-based number of the current review round, 0 before review starts.
    pub fn review_round(&self) -> u32 {
        self.review_round
    }

    /// Whether the question under the cursor has been answered on this visit.
    pub fn has_answered_current(&self) -> bool {
        self.answered_current
    }

    fn active_sequence(&self) -> &[usize] {
        match self.phase {
            Phase::Initial => &self.initial_order,
            Phase::Review => &self.review_queue,
            Phase::Done => &[],
        }
    }

    /// Index into [`records`](Self::records) of the question under the cursor.
    pub fn current_record_index(&self) -> Option<usize> {
        self.active_sequence().get(self.current_index).copied()
    }

    /// The question to show, or `None` once done (or for an empty quiz).
    pub fn current_question(&self) -> Option<&QuestionRecord> {
        self.current_record_index().map(|idx| &self.records[idx])
    }

    /// Record an answer for the current question.
    ///
    /// Every call counts as an attempt, including repeats on the same visit.
    /// Only the first-ever answer to a question determines its score.
    pub fn submit_answer(&mut self, selected: usize) -> Result<AnswerOutcome, SessionError> {
        if self.is_done() {
            return Err(SessionError::AlreadyDone);
        }
        let idx = self
            .current_record_index()
            .ok_or(SessionError::NoCurrentQuestion)?;

        let record = &mut self.records[idx];
        if selected >= record.options().len() {
            return Err(SessionError::OptionOutOfRange {
                selected,
                option_count: record.options().len(),
            });
        }

        let first_attempt = record.record_answer(selected);
        let correct = record.is_correct(selected);
        let outcome = AnswerOutcome {
            question_id: record.id(),
            selected_index: selected,
            correct_index: record.correct_index(),
            correct,
            first_attempt,
            explanation: record.explanation().to_string(),
        };

        if first_attempt && !correct {
            self.wrong_indices.push(idx);
        }
        if correct && self.phase == Phase::Review {
            self.remaining_to_fix.remove(&idx);
        }
        self.answered_current = true;

        tracing::debug!(
            question = outcome.question_id,
            selected,
            correct,
            first_attempt,
            phase = %self.phase,
            "answer recorded"
        );
        Ok(outcome)
    }

    /// Move to the next question, starting a review round or finishing when
    /// the active sequence is exhausted. Returns the phase after the move.
    pub fn advance(&mut self) -> Result<Phase, SessionError> {
        if self.is_done() {
            return Err(SessionError::AlreadyDone);
        }
        if let Some(idx) = self.current_record_index() {
            if !self.answered_current {
                return Err(SessionError::NotAnswered {
                    question_id: self.records[idx].id(),
                });
            }
        }

        if self.current_index + 1 < self.active_sequence().len() {
            self.current_index += 1;
            self.answered_current = false;
            return Ok(self.phase);
        }

        match self.phase {
            Phase::Initial if !self.wrong_indices.is_empty() => {
                self.remaining_to_fix = self.wrong_indices.iter().copied().collect();
                self.start_review_round(self.wrong_indices.clone());
            }
            Phase::Review if !self.remaining_to_fix.is_empty() => {
                let queue = self.remaining_to_fix.iter().copied().collect();
                self.start_review_round(queue);
            }
            _ => self.finish(),
        }
        Ok(self.phase)
    }

    fn start_review_round(&mut self, queue: Vec<usize>) {
        self.phase = Phase::Review;
        self.review_round += 1;
        self.review_queue = queue;
        self.current_index = 0;
        self.answered_current = false;
        tracing::info!(
            round = self.review_round,
            questions = self.review_queue.len(),
            "starting review round"
        );
    }

    fn finish(&mut self) {
        self.phase = Phase::Done;
        self.review_queue.clear();
        self.current_index = 0;
        self.answered_current = false;
        tracing::info!(
            questions = self.records.len(),
            missed_first_try = self.wrong_indices.len(),
            review_rounds = self.review_round,
            "quiz session done"
        );
    }

    /// First-attempt completion as a percentage in `[0, 100]`.
    pub fn progress(&self) -> f64 {
        progress::percent(&self.records)
    }

    /// Progress with the counts and phase needed for display.
    pub fn progress_report(&self) -> Progress {
        Progress::from_session(self)
    }

    /// Build the final report. Only legal once the session is done.
    pub fn build_summary(&self) -> Result<QuizSummary, SessionError> {
        if !self.is_done() {
            return Err(SessionError::NotDone { phase: self.phase });
        }
        Ok(QuizSummary::from_records(&self.records))
    }

    /// Hand the records back, e.g. for history persistence.
    pub fn into_records(self) -> Vec<QuestionRecord> {
        self.records
    }

    /// Verify that a deserialized session is internally consistent before
    /// it is resumed.
    pub fn check_consistency(&self) -> Result<(), SnapshotError> {
        let n = self.records.len();
        let inconsistent = |msg: String| Err(SnapshotError::Inconsistent(msg));

        for (position, record) in self.records.iter().enumerate() {
            if let Err(e) = record.validate() {
                return inconsistent(format!("record {position}: {e}"));
            }
            if !record.tracking_is_consistent() {
                return inconsistent(format!("record {position}: attempt fields disagree"));
            }
        }

        if self.initial_order != (0..n).collect::<Vec<_>>() {
            return inconsistent("initial order is not the load order".into());
        }

        let out_of_range = self
            .wrong_indices
            .iter()
            .chain(&self.review_queue)
            .chain(&self.remaining_to_fix)
            .find(|&&idx| idx >= n);
        if let Some(idx) = out_of_range {
            return inconsistent(format!("record index {idx} out of range for {n} records"));
        }

        let mut seen = HashSet::new();
        for &idx in &self.wrong_indices {
            if !seen.insert(idx) {
                return inconsistent(format!("record {idx} listed twice as missed"));
            }
            if self.records[idx].first_answer_correct() != Some(false) {
                return inconsistent(format!("record {idx} listed as missed but was not"));
            }
        }
        if !self.remaining_to_fix.iter().all(|idx| seen.contains(idx)) {
            return inconsistent("review set contains questions that were not missed".into());
        }

        match self.phase {
            Phase::Initial if self.review_round != 0 => {
                return inconsistent("initial phase with a review round".into());
            }
            Phase::Review if self.review_round == 0 || self.review_queue.is_empty() => {
                return inconsistent("review phase without an active round".into());
            }
            Phase::Done if !self.remaining_to_fix.is_empty() => {
                return inconsistent("done with questions left to fix".into());
            }
            _ => {}
        }

        let active_len = self.active_sequence().len();
        let cursor_ok = if active_len == 0 {
            self.current_index == 0 && !self.answered_current
        } else {
            self.current_index < active_len
        };
        if !cursor_ok {
            return inconsistent(format!(
                "cursor {} does not fit a sequence of {active_len}",
                self.current_index
            ));
        }

        Ok(())
    }
}
