//! Error types for the quiz core.
//!
//! `SessionError` is returned for caller-protocol violations: the session
//! rejects the call and leaves its state untouched. `RecordError` guards the
//! question record invariants, and `SnapshotError` is returned when a
//! persisted session cannot be resumed.

use thiserror::Error;

use crate::model::Phase;

/// A question record failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The prompt text is empty or whitespace.
    #[error("question text is empty")]
    EmptyQuestion,

    /// A question needs at least two options to choose from.
    #[error("expected at least 2 options, found {count}")]
    TooFewOptions { count: usize },

    /// The correct index does not point at an option.
    #[error("correct index {index} is out of range for {option_count} options")]
    CorrectIndexOutOfRange { index: usize, option_count: usize },
}

/// A call was made that the session's current state does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The session has finished; only summary retrieval is allowed.
    #[error("quiz session is already done")]
    AlreadyDone,

    /// The active sequence is empty, so there is nothing to answer.
    #[error("there is no current question")]
    NoCurrentQuestion,

    /// `advance` was called before the current question was answered.
    #[error("question {question_id} has not been answered yet")]
    NotAnswered { question_id: usize },

    /// The selected option does not exist on the current question.
    #[error("option {selected} is out of range for {option_count} options")]
    OptionOutOfRange { selected: usize, option_count: usize },

    /// A summary was requested before the session reached `Done`.
    #[error("summary is only available once the quiz is done (phase: {phase})")]
    NotDone { phase: Phase },
}

/// A persisted session could not be restored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// The payload was written by an incompatible schema version.
    #[error("unsupported payload version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// The payload deserialized but its fields contradict each other.
    #[error("inconsistent session state: {0}")]
    Inconsistent(String),
}
