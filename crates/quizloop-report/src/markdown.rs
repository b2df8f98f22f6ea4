//! Markdown results, suitable for pasting into an issue or a README.

use quizloop_core::persist::SummaryPayload;

/// Format a finished quiz as markdown.
pub fn generate_markdown(payload: &SummaryPayload) -> String {
    let summary = &payload.summary;
    let mut md = String::new();

    md.push_str(&format!(
        "## {}\n\n",
        payload.quiz_title.as_deref().unwrap_or("Quiz results")
    ));
    md.push_str(&format!(
        "**Score:** {} ({:.1}%)\n\n",
        summary.headline(),
        summary.score_percent()
    ));

    if summary.question_summaries.is_empty() {
        md.push_str("_No questions._\n");
        return md;
    }

    md.push_str("| # | Question | First try | Answered | Correct |\n");
    md.push_str("|---|----------|-----------|----------|---------|\n");
    for (n, q) in summary.question_summaries.iter().enumerate() {
        let answered = q
            .first_answer_index
            .map(|i| (i + 1).to_string())
            .unwrap_or_else(|| "-".to_string());
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            n + 1,
            escape_cell(&q.question),
            if q.first_answer_correct { "\u{2714}" } else { "\u{2716}" },
            answered,
            q.correct_index + 1
        ));
    }

    md
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizloop_core::summary::{QuestionSummary, QuizSummary};

    #[test]
    fn table_lists_every_question() {
        let payload = SummaryPayload::new(
            uuid::Uuid::nil(),
            Some("Pipes".into()),
            QuizSummary {
                total_questions: 2,
                correct_on_first_try: 1,
                wrong_on_first_try: 1,
                question_summaries: vec![
                    QuestionSummary {
                        id: 0,
                        question: "a | b?".into(),
                        first_answer_index: Some(2),
                        first_answer_correct: true,
                        correct_index: 2,
                    },
                    QuestionSummary {
                        id: 1,
                        question: "second".into(),
                        first_answer_index: Some(0),
                        first_answer_correct: false,
                        correct_index: 1,
                    },
                ],
            },
        );

        let md = generate_markdown(&payload);
        assert!(md.starts_with("## Pipes\n"));
        assert!(md.contains("**Score:** 1 / 2 correct on first try (50.0%)"));
        assert!(md.contains("| 1 | a \\| b? | \u{2714} | 3 | 3 |"));
        assert!(md.contains("| 2 | second | \u{2716} | 1 | 2 |"));
    }

    #[test]
    fn empty_quiz() {
        let payload = SummaryPayload::new(uuid::Uuid::nil(), None, QuizSummary::from_records(&[]));
        let md = generate_markdown(&payload);
        assert!(md.contains("## Quiz results"));
        assert!(md.contains("0 / 0 correct on first try (0.0%)"));
        assert!(md.contains("_No questions._"));
    }
}
