//! quizloop-core: Quiz session state machine, loader, and scoring.
//!
//! This crate defines the question model, the CSV loader, the session state
//! machine that sequences the initial and review passes, and the two
//! persisted payloads the rest of quizloop builds on.

pub mod driver;
pub mod error;
pub mod model;
pub mod parser;
pub mod persist;
pub mod progress;
pub mod session;
pub mod summary;

pub use error::{RecordError, SessionError, SnapshotError};
pub use model::{AnswerOutcome, Phase, QuestionRecord};
pub use session::QuizSession;
pub use summary::{QuestionSummary, QuizSummary};
