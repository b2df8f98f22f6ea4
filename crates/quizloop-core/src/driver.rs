//! Drives a quiz session from presenter input.
//!
//! The runner owns the loop that alternates between asking the presenter for
//! a choice, submitting it, revealing feedback and advancing. After every
//! step it checkpoints the session into the question-set slot so an
//! abandoned quiz can be resumed, and on completion it writes both slots.

use anyhow::Result;
use uuid::Uuid;

use crate::model::{AnswerOutcome, Phase, QuestionRecord};
use crate::persist::{self, QuestionSetPayload, SlotStore, SummaryPayload};
use crate::progress::Progress;
use crate::session::QuizSession;

/// What the user did when asked for an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Select the option at this 0-based position.
    Option(usize),
    Quit,
}

/// Everything needed to render the current question.
#[derive(Debug, Clone)]
pub struct QuestionView<'a> {
    pub record: &'a QuestionRecord,
    pub phase: Phase,
    /// 1-based position within the active sequence.
    pub position: usize,
    pub sequence_len: usize,
    pub progress: Progress,
}

/// Rendering and input for a quiz. Implemented by front ends.
pub trait QuizPresenter {
    fn show_question(&mut self, view: &QuestionView<'_>) -> Result<()>;

    /// Ask for an option in `0..option_count`, or a quit.
    fn choose(&mut self, option_count: usize) -> Result<Choice>;

    /// Reveal correctness, the correct option and the explanation.
    fn show_outcome(&mut self, record: &QuestionRecord, outcome: &AnswerOutcome) -> Result<()>;

    /// Wait for the user to move on. `false` abandons the quiz.
    fn confirm_continue(&mut self) -> Result<bool>;

    /// Called when a review round starts or the quiz finishes.
    fn on_transition(&mut self, progress: &Progress) -> Result<()>;
}

/// How a run ended.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Finished(SummaryPayload),
    /// The user quit; the question-set slot holds the checkpoint.
    Abandoned,
}

/// Runs sessions against a presenter and a slot store.
pub struct QuizRunner<'a> {
    store: &'a dyn SlotStore,
    session_id: Uuid,
    quiz_title: Option<String>,
}

impl<'a> QuizRunner<'a> {
    pub fn new(store: &'a dyn SlotStore, session_id: Uuid, quiz_title: Option<String>) -> Self {
        Self {
            store,
            session_id,
            quiz_title,
        }
    }

    /// Resume with the identity stored in a saved question set.
    pub fn for_payload(store: &'a dyn SlotStore, payload: &QuestionSetPayload) -> Self {
        Self::new(store, payload.session_id, payload.quiz_title.clone())
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Save a freshly created session and clear any previous summary.
    pub fn begin(&self, session: &QuizSession) -> Result<()> {
        persist::begin_quiz(self.store, &self.question_set(session))
    }

    fn question_set(&self, session: &QuizSession) -> QuestionSetPayload {
        QuestionSetPayload::new(self.session_id, self.quiz_title.clone(), session)
    }

    fn checkpoint(&self, session: &QuizSession) -> Result<()> {
        persist::save_question_set(self.store, &self.question_set(session))
    }

    /// Play until the session is done or the presenter quits.
    pub fn run(
        &self,
        session: &mut QuizSession,
        presenter: &mut dyn QuizPresenter,
    ) -> Result<RunOutcome> {
        while !session.is_done() {
            let Some(idx) = session.current_record_index() else {
                // Nothing to ask: an empty quiz finishes immediately.
                session.advance()?;
                continue;
            };

            if !session.has_answered_current() {
                let view = QuestionView {
                    record: &session.records()[idx],
                    phase: session.phase(),
                    position: session.current_index() + 1,
                    sequence_len: match session.phase() {
                        Phase::Review => session.review_queue().len(),
                        _ => session.total_questions(),
                    },
                    progress: session.progress_report(),
                };
                presenter.show_question(&view)?;

                let option_count = session.records()[idx].options().len();
                let selected = match presenter.choose(option_count)? {
                    Choice::Option(selected) => selected,
                    Choice::Quit => return self.abandon(session),
                };

                let outcome = session.submit_answer(selected)?;
                self.checkpoint(session)?;
                presenter.show_outcome(&session.records()[idx], &outcome)?;
            }

            if !presenter.confirm_continue()? {
                return self.abandon(session);
            }

            let round_before = (session.phase(), session.review_round());
            session.advance()?;
            self.checkpoint(session)?;
            if (session.phase(), session.review_round()) != round_before {
                presenter.on_transition(&session.progress_report())?;
            }
        }

        let summary = SummaryPayload::new(
            self.session_id,
            self.quiz_title.clone(),
            session.build_summary()?,
        );
        persist::finish_quiz(self.store, &self.question_set(session), &summary)?;
        Ok(RunOutcome::Finished(summary))
    }

    fn abandon(&self, session: &QuizSession) -> Result<RunOutcome> {
        self.checkpoint(session)?;
        tracing::info!(session = %self.session_id, phase = %session.phase(), "quiz abandoned");
        Ok(RunOutcome::Abandoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use crate::persist::{load_question_set, load_summary, MemorySlotStore};

    /// Replays a fixed list of choices and records what was shown.
    #[derive(Default)]
    struct ScriptedPresenter {
        choices: VecDeque<Choice>,
        continues: VecDeque<bool>,
        shown: Vec<(usize, Phase)>,
        outcomes: Vec<bool>,
        transitions: Vec<(Phase, u32)>,
    }

    impl ScriptedPresenter {
        fn answering(choices: &[usize]) -> Self {
            Self {
                choices: choices.iter().map(|&c| Choice::Option(c)).collect(),
                ..Default::default()
            }
        }
    }

    impl QuizPresenter for ScriptedPresenter {
        fn show_question(&mut self, view: &QuestionView<'_>) -> Result<()> {
            self.shown.push((view.record.id(), view.phase));
            Ok(())
        }

        fn choose(&mut self, _option_count: usize) -> Result<Choice> {
            Ok(self.choices.pop_front().unwrap_or(Choice::Quit))
        }

        fn show_outcome(&mut self, _: &QuestionRecord, outcome: &AnswerOutcome) -> Result<()> {
            self.outcomes.push(outcome.correct);
            Ok(())
        }

        fn confirm_continue(&mut self) -> Result<bool> {
            Ok(self.continues.pop_front().unwrap_or(true))
        }

        fn on_transition(&mut self, progress: &Progress) -> Result<()> {
            self.transitions.push((progress.phase, progress.review_round));
            Ok(())
        }
    }

    fn session(n: usize) -> QuizSession {
        let records = (0..n)
            .map(|i| {
                QuestionRecord::new(
                    i,
                    format!("Q{i}"),
                    vec!["A".into(), "B".into(), "C".into()],
                    0,
                    "",
                )
                .unwrap()
            })
            .collect();
        QuizSession::new(records)
    }

    #[test]
    fn plays_through_review_and_saves_both_slots() {
        let store = MemorySlotStore::new();
        let runner = QuizRunner::new(&store, Uuid::nil(), Some("Demo".into()));
        let mut session = session(3);
        runner.begin(&session).unwrap();

        let mut presenter = ScriptedPresenter::answering(&[0, 1, 0, 0]);
        let outcome = runner.run(&mut session, &mut presenter).unwrap();

        let RunOutcome::Finished(payload) = outcome else {
            panic!("quiz should finish");
        };
        assert_eq!(payload.summary.correct_on_first_try, 2);
        assert_eq!(payload.quiz_title.as_deref(), Some("Demo"));
        assert_eq!(
            presenter.shown,
            vec![
                (0, Phase::Initial),
                (1, Phase::Initial),
                (2, Phase::Initial),
                (1, Phase::Review)
            ]
        );
        assert_eq!(presenter.outcomes, vec![true, false, true, true]);
        assert_eq!(
            presenter.transitions,
            vec![(Phase::Review, 1), (Phase::Done, 1)]
        );

        assert!(load_summary(&store).unwrap().is_some());
        let saved = load_question_set(&store).unwrap().unwrap();
        assert_eq!(saved.session.phase(), Phase::Done);
    }

    #[test]
    fn quitting_leaves_a_resumable_checkpoint() {
        let store = MemorySlotStore::new();
        let runner = QuizRunner::new(&store, Uuid::new_v4(), None);
        let mut session = session(3);
        runner.begin(&session).unwrap();

        let mut presenter = ScriptedPresenter::answering(&[2]);
        let outcome = runner.run(&mut session, &mut presenter).unwrap();
        assert!(matches!(outcome, RunOutcome::Abandoned));
        assert!(load_summary(&store).unwrap().is_none());

        let saved = load_question_set(&store).unwrap().unwrap();
        let resumed_runner = QuizRunner::for_payload(&store, &saved);
        assert_eq!(resumed_runner.session_id(), runner.session_id());

        let mut resumed = saved.into_session().unwrap();
        assert_eq!(resumed.current_index(), 1);

        let mut presenter = ScriptedPresenter::answering(&[0, 0, 0]);
        let outcome = resumed_runner.run(&mut resumed, &mut presenter).unwrap();
        let RunOutcome::Finished(payload) = outcome else {
            panic!("resumed quiz should finish");
        };
        assert_eq!(payload.summary.wrong_on_first_try, 1);
        assert_eq!(resumed.records()[0].attempts(), 2);
    }

    #[test]
    fn quitting_at_feedback_resumes_without_reasking() {
        let store = MemorySlotStore::new();
        let runner = QuizRunner::new(&store, Uuid::nil(), None);
        let mut session = session(1);

        let mut presenter = ScriptedPresenter::answering(&[0]);
        presenter.continues.push_back(false);
        assert!(matches!(
            runner.run(&mut session, &mut presenter).unwrap(),
            RunOutcome::Abandoned
        ));

        let mut resumed = load_question_set(&store)
            .unwrap()
            .unwrap()
            .into_session()
            .unwrap();
        assert!(resumed.has_answered_current());

        let mut presenter = ScriptedPresenter::default();
        let outcome = runner.run(&mut resumed, &mut presenter).unwrap();
        assert!(matches!(outcome, RunOutcome::Finished(_)));
        assert!(presenter.shown.is_empty());
        assert_eq!(resumed.records()[0].attempts(), 1);
    }

    #[test]
    fn empty_quiz_finishes_without_prompting() {
        let store = MemorySlotStore::new();
        let runner = QuizRunner::new(&store, Uuid::nil(), None);
        let mut session = QuizSession::new(Vec::new());
        let mut presenter = ScriptedPresenter::default();

        let RunOutcome::Finished(payload) = runner.run(&mut session, &mut presenter).unwrap()
        else {
            panic!("empty quiz should finish");
        };
        assert_eq!(payload.summary.total_questions, 0);
        assert!(presenter.shown.is_empty());
    }

    #[test]
    fn out_of_range_choice_is_an_error() {
        let store = MemorySlotStore::new();
        let runner = QuizRunner::new(&store, Uuid::nil(), None);
        let mut session = session(1);
        let mut presenter = ScriptedPresenter::answering(&[7]);

        let err = runner.run(&mut session, &mut presenter).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }
}
