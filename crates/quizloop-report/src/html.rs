//! HTML results page.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use quizloop_core::persist::SummaryPayload;
use quizloop_core::summary::QuestionSummary;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate the results page for a finished quiz.
pub fn generate_html(payload: &SummaryPayload) -> String {
    let summary = &payload.summary;
    let title = payload.quiz_title.as_deref().unwrap_or("Quiz");
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{} results</title>\n", html_escape(title)));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(title)));
    html.push_str(&format!(
        "<p class=\"meta\">Completed {} | session {}</p>\n",
        payload.completed_at.format("%Y-%m-%d %H:%M:%S UTC"),
        payload.session_id
    ));
    html.push_str("</header>\n");

    // Score
    html.push_str("<section class=\"score\">\n");
    html.push_str(&format!(
        "<p class=\"headline\">{}</p>\n",
        html_escape(&summary.headline())
    ));
    html.push_str(&generate_score_bar(summary.score_percent()));
    html.push_str("</section>\n");

    // Per-question list
    html.push_str("<section class=\"questions\">\n");
    html.push_str("<h2>Questions</h2>\n");
    if summary.question_summaries.is_empty() {
        html.push_str("<p class=\"meta\">This quiz had no questions.</p>\n");
    } else {
        html.push_str("<ol class=\"question-list\">\n");
        for q in &summary.question_summaries {
            html.push_str(&question_item(q));
        }
        html.push_str("</ol>\n");
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(payload)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

fn question_item(q: &QuestionSummary) -> String {
    let (class, mark) = if q.first_answer_correct {
        ("pass", "\u{2714}")
    } else {
        ("fail", "\u{2716}")
    };

    let detail = match q.first_answer_index {
        Some(_) if q.first_answer_correct => String::new(),
        Some(chosen) => format!(
            " <span class=\"meta\">(answered option {}, correct was option {})</span>",
            chosen + 1,
            q.correct_index + 1
        ),
        None => " <span class=\"meta\">(not answered)</span>".to_string(),
    };

    format!(
        "<li class=\"{class}\"><span class=\"mark\">{mark}</span> {}{detail}</li>\n",
        html_escape(&q.question)
    )
}

fn generate_score_bar(percent: f64) -> String {
    let max_width = 400.0;
    let width = (percent / 100.0 * max_width).round() as usize;

    let color = if percent >= 80.0 {
        "#22c55e"
    } else if percent >= 50.0 {
        "#eab308"
    } else {
        "#ef4444"
    };

    format!(
        "<svg width=\"460\" height=\"30\" xmlns=\"http://www.w3.org/2000/svg\">\n\
         \x20 <rect x=\"0\" y=\"0\" width=\"{max_width}\" height=\"30\" fill=\"var(--border)\" rx=\"4\"/>\n\
         \x20 <rect x=\"0\" y=\"0\" width=\"{width}\" height=\"30\" fill=\"{color}\" rx=\"4\"/>\n\
         \x20 <text x=\"{}\" y=\"15\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{percent:.1}%</text>\n\
         </svg>\n",
        max_width as usize + 8
    )
}

/// Write the results page to a file.
pub fn write_html_report(payload: &SummaryPayload, path: &Path) -> Result<()> {
    let html = generate_html(payload);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report: {}", path.display()))?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.headline { font-size: 1.5rem; font-weight: bold; }
.question-list { padding-left: 1.5rem; }
.question-list li { padding: 0.5rem 1rem; margin: 0.25rem 0; border-radius: 6px; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
.mark { font-weight: bold; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;
