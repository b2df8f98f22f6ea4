//! The `quizloop results` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use quizloop_core::persist::{load_summary, FileSlotStore};
use quizloop_core::QuizSummary;
use quizloop_report::{generate_html, generate_markdown, write_html_report};

pub fn execute(
    format: String,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    state_dir: Option<PathBuf>,
) -> Result<()> {
    let config = super::load_with_state_dir(config_path.as_deref(), state_dir)?;
    let store = FileSlotStore::new(&config.state_dir);

    let payload = load_summary(&store)?.with_context(|| {
        format!(
            "no quiz results in {}; finish a quiz with `quizloop play` first",
            config.state_dir.display()
        )
    })?;

    let rendered = match format.as_str() {
        "json" => serde_json::to_string_pretty(&payload)?,
        "markdown" | "md" => generate_markdown(&payload),
        "html" => generate_html(&payload),
        "text" => {
            let title = payload.quiz_title.as_deref().unwrap_or("Quiz");
            format!(
                "{title}: {}\n{}",
                payload.summary.headline(),
                summary_table(&payload.summary)
            )
        }
        other => anyhow::bail!("unknown format: {other} (expected text, json, markdown or html)"),
    };

    match output {
        Some(path) if format == "html" => {
            write_html_report(&payload, &path)?;
            println!("Wrote {}", path.display());
        }
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

/// One row per question with its first-try result, 1-based option numbers.
pub fn summary_table(summary: &QuizSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "First try", "Answered", "Correct"]);

    for (n, q) in summary.question_summaries.iter().enumerate() {
        let mark = if q.first_answer_correct {
            "\u{2714}"
        } else {
            "\u{2716}"
        };
        let answered = q
            .first_answer_index
            .map(|i| (i + 1).to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(n + 1),
            Cell::new(&q.question),
            Cell::new(mark),
            Cell::new(answered),
            Cell::new(q.correct_index + 1),
        ]);
    }

    table
}
