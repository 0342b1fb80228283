//! HTML feedback page.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::Result;
use std::path::Path;

use modmark_core::scoring::Grade;

use crate::{fmt_score, FeedbackReport};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML page from a feedback report.
pub fn generate_html(report: &FeedbackReport) -> String {
    let sheet = &report.sheet;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>Feedback: {}</title>\n",
        html_escape(&sheet.rubric_title)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&sheet.rubric_title)));
    let subject = report
        .subject
        .as_deref()
        .map(|s| format!("Submission: <strong>{}</strong> | ", html_escape(s)))
        .unwrap_or_default();
    html.push_str(&format!(
        "<p class=\"meta\">{}Generated {}</p>\n",
        subject,
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str(&format!(
        "<p class=\"total\">Score: <strong>{} / {}</strong> ({} of {} criteria graded)</p>\n",
        fmt_score(sheet.total()),
        fmt_score(sheet.max_total()),
        sheet.graded_count(),
        sheet.criteria.len()
    ));
    html.push_str("</header>\n");

    // Per-criterion feedback
    html.push_str("<section class=\"criteria\">\n");
    html.push_str("<table>\n");
    html.push_str("<thead><tr><th>Criterion</th><th>Weight</th><th>Level</th><th>Score</th><th>Feedback</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for c in &sheet.criteria {
        match &c.grade {
            Grade::Graded {
                level,
                score,
                description,
            } => html.push_str(&format!(
                "<tr class=\"graded\"><td>{}</td><td>{}</td><td>{}</td><td>{} / {}</td><td>{}</td></tr>\n",
                html_escape(&c.name),
                fmt_score(c.weight),
                level,
                fmt_score(*score),
                fmt_score(c.max_score),
                html_escape(description)
            )),
            Grade::NotGraded => html.push_str(&format!(
                "<tr class=\"not-graded\"><td>{}</td><td>{}</td><td>-</td><td>- / {}</td><td>Not graded</td></tr>\n",
                html_escape(&c.name),
                fmt_score(c.weight),
                fmt_score(c.max_score)
            )),
        }
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    if let Some(comment) = sheet.comment.as_deref().filter(|c| !c.trim().is_empty()) {
        html.push_str("<section class=\"comment\">\n<h2>Comment</h2>\n");
        html.push_str(&format!("<p>{}</p>\n", html_escape(comment)));
        html.push_str("</section>\n");
    }

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML feedback page to a file.
pub fn write_html_report(report: &FeedbackReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --graded: #dcfce7; --pending: #f3f4f6; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --graded: #064e3b; --pending: #1f2937; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.total { font-size: 1.25rem; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.graded { background: var(--graded); }
.not-graded { background: var(--pending); font-style: italic; }
"#;
