//! The `quizloop play` command.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use uuid::Uuid;

use quizloop_catalog::catalog::pretty_title;
use quizloop_catalog::{create_catalog, load_quiz};
use quizloop_core::driver::{Choice, QuestionView, QuizPresenter, QuizRunner, RunOutcome};
use quizloop_core::parser::parse_quiz_file;
use quizloop_core::persist::{load_question_set, FileSlotStore};
use quizloop_core::progress::Progress;
use quizloop_core::{AnswerOutcome, Phase, QuestionRecord, QuizSession};

use super::results::summary_table;

/// Where the questions for a new session come from.
pub enum Source {
    File(PathBuf),
    Catalog(String),
    Resume,
}

/// Console presenter reading answers line by line.
pub struct TerminalPresenter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPresenter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// `None` on end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let n = self
            .input
            .read_line(&mut line)
            .context("failed to read from stdin")?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

fn is_quit(answer: &str) -> bool {
    answer.eq_ignore_ascii_case("q") || answer.eq_ignore_ascii_case("quit")
}

impl<R: BufRead, W: Write> QuizPresenter for TerminalPresenter<R, W> {
    fn show_question(&mut self, view: &QuestionView<'_>) -> Result<()> {
        let heading = match view.phase {
            Phase::Review => format!(
                "Review {}/{} (round {})",
                view.position, view.sequence_len, view.progress.review_round
            ),
            _ => format!("Question {}/{}", view.position, view.sequence_len),
        };
        writeln!(
            self.output,
            "\n{heading}  {} {:.0}%",
            view.progress.bar(20),
            view.progress.percent
        )?;
        writeln!(self.output, "{}", view.record.question())?;
        for (i, option) in view.record.options().iter().enumerate() {
            writeln!(self.output, "  {}) {option}", i + 1)?;
        }
        Ok(())
    }

    fn choose(&mut self, option_count: usize) -> Result<Choice> {
        loop {
            write!(self.output, "Your answer (1-{option_count}, q to quit): ")?;
            self.output.flush()?;

            let Some(answer) = self.read_line()? else {
                return Ok(Choice::Quit);
            };
            if is_quit(&answer) {
                return Ok(Choice::Quit);
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=option_count).contains(&n) => return Ok(Choice::Option(n - 1)),
                _ => writeln!(
                    self.output,
                    "Please enter a number between 1 and {option_count}."
                )?,
            }
        }
    }

    fn show_outcome(&mut self, record: &QuestionRecord, outcome: &AnswerOutcome) -> Result<()> {
        if outcome.correct {
            writeln!(self.output, "\u{2714} Correct!")?;
        } else {
            let correct = &record.options()[outcome.correct_index];
            writeln!(
                self.output,
                "\u{2716} Wrong. The correct answer is {}) {correct}",
                outcome.correct_index + 1
            )?;
        }
        if !outcome.explanation.is_empty() {
            writeln!(self.output, "  {}", outcome.explanation)?;
        }
        Ok(())
    }

    fn confirm_continue(&mut self) -> Result<bool> {
        write!(self.output, "Press Enter to continue (q to quit): ")?;
        self.output.flush()?;
        Ok(match self.read_line()? {
            Some(answer) => !is_quit(&answer),
            None => false,
        })
    }

    fn on_transition(&mut self, progress: &Progress) -> Result<()> {
        match progress.phase {
            Phase::Review => writeln!(
                self.output,
                "\n--- Review round {}: let's fix the ones you missed ---",
                progress.review_round
            )?,
            Phase::Done => writeln!(self.output, "\nEvery question has been answered correctly.")?,
            Phase::Initial => {}
        }
        Ok(())
    }
}

pub async fn execute(
    source: Source,
    config_path: Option<PathBuf>,
    state_dir: Option<PathBuf>,
) -> Result<()> {
    let config = super::load_with_state_dir(config_path.as_deref(), state_dir)?;
    let store = FileSlotStore::new(&config.state_dir);

    let (mut session, runner) = match source {
        Source::Resume => {
            let payload = load_question_set(&store)?.with_context(|| {
                format!(
                    "no saved quiz in {}; start one with `quizloop play --file <csv>`",
                    config.state_dir.display()
                )
            })?;
            let runner = QuizRunner::for_payload(&store, &payload);
            let title = payload.quiz_title.clone().unwrap_or_else(|| "quiz".to_string());
            let session = payload
                .into_session()
                .context("saved quiz cannot be resumed")?;
            eprintln!(
                "Resuming {} ({} phase, {} of {} answered)",
                title,
                session.phase(),
                session.progress_report().answered,
                session.total_questions()
            );
            (session, runner)
        }
        Source::File(path) => {
            let records = parse_quiz_file(&path)?;
            let title = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(pretty_title)
                .unwrap_or_else(|| "Quiz".to_string());
            start(&store, records, title)?
        }
        Source::Catalog(file) => {
            let catalog = create_catalog(&config.catalog, config.request_timeout_secs)?;
            let records = load_quiz(catalog.as_ref(), &file).await?;
            let title = match catalog.list().await {
                Ok(entries) => entries
                    .into_iter()
                    .find(|e| e.file == file)
                    .map(|e| e.title)
                    .unwrap_or_else(|| pretty_title(&file)),
                Err(e) => {
                    tracing::warn!("could not list catalog for quiz title: {e:#}");
                    pretty_title(&file)
                }
            };
            start(&store, records, title)?
        }
    };

    let stdin = io::stdin();
    let mut presenter = TerminalPresenter::new(stdin.lock(), io::stdout());

    match runner.run(&mut session, &mut presenter)? {
        RunOutcome::Finished(payload) => {
            println!("\n{}", payload.summary.headline());
            println!("{}", summary_table(&payload.summary));
            println!("Results saved. Show them again with `quizloop results`.");
        }
        RunOutcome::Abandoned => {
            println!(
                "\nProgress saved to {}. Continue with `quizloop play --resume`.",
                config.state_dir.display()
            );
        }
    }

    Ok(())
}

fn start<'a>(
    store: &'a FileSlotStore,
    records: Vec<QuestionRecord>,
    title: String,
) -> Result<(QuizSession, QuizRunner<'a>)> {
    let session = QuizSession::new(records);
    let runner = QuizRunner::new(store, Uuid::new_v4(), Some(title));
    runner.begin(&session)?;
    tracing::info!(
        session = %runner.session_id(),
        questions = session.total_questions(),
        "quiz started"
    );
    Ok((session, runner))
}
