//! The `modmark feedback` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use modmark_core::payload::RubricDocument;
use modmark_core::scoring::{score_submission, Grade, SubmissionGrades};
use modmark_core::traits::RubricStore;
use modmark_report::FeedbackReport;

use super::connect;

pub async fn execute(
    rubric: String,
    grades: PathBuf,
    format: String,
    subject: Option<String>,
    out: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let doc = load_rubric(&rubric, config_path.as_deref()).await?;
    let content = std::fs::read_to_string(&grades)
        .with_context(|| format!("failed to read {}", grades.display()))?;
    let grades: SubmissionGrades = serde_json::from_str(&content)
        .with_context(|| format!("invalid grades in {}", grades.display()))?;

    let sheet = score_submission(&doc, &grades);
    let report = FeedbackReport::new(sheet, subject);

    match (format.as_str(), out) {
        ("html", Some(path)) => {
            modmark_report::write_html_report(&report, &path)?;
            println!("Feedback written to {}", path.display());
        }
        ("json", Some(path)) => {
            report.save_json(&path)?;
            println!("Feedback written to {}", path.display());
        }
        (format, out) => {
            let rendered = match format {
                "text" => render_text(&report),
                "markdown" => report.to_markdown(),
                "html" => modmark_report::generate_html(&report),
                "json" => serde_json::to_string_pretty(&report)?,
                other => anyhow::bail!(
                    "unknown format: {other} (expected text, markdown, html or json)"
                ),
            };
            match out {
                Some(path) => {
                    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Feedback written to {}", path.display());
                }
                None => println!("{rendered}"),
            }
        }
    }
    Ok(())
}

/// A path to a rubric JSON file, otherwise a rubric id on the backend.
async fn load_rubric(rubric: &str, config_path: Option<&Path>) -> Result<RubricDocument> {
    let path = Path::new(rubric);
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        return serde_json::from_str(&content)
            .with_context(|| format!("invalid rubric in {}", path.display()));
    }
    let store = connect(config_path)?;
    store.get(rubric).await
}

fn render_text(report: &FeedbackReport) -> String {
    let sheet = &report.sheet;
    let mut text = format!("{}\n", sheet.rubric_title);
    if let Some(subject) = &report.subject {
        text.push_str(&format!("Submission: {subject}\n"));
    }
    text.push('\n');

    for c in &sheet.criteria {
        match &c.grade {
            Grade::Graded {
                level,
                score,
                description,
            } => text.push_str(&format!(
                "  {:<24} level {level}  {score} / {}  {description}\n",
                c.name, c.max_score
            )),
            Grade::NotGraded => text.push_str(&format!(
                "  {:<24} Not graded  - / {}\n",
                c.name, c.max_score
            )),
        }
    }

    text.push_str(&format!(
        "\nTotal: {} / {} ({} of {} criteria graded)\n",
        sheet.total(),
        sheet.max_total(),
        sheet.graded_count(),
        sheet.criteria.len()
    ));
    if let Some(comment) = sheet.comment.as_deref().filter(|c| !c.trim().is_empty()) {
        text.push_str(&format!("Comment: {comment}\n"));
    }
    text
}
