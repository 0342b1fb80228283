//! modmark-report: feedback reports for graded submissions.
//!
//! Wraps a [`ScoreSheet`] with generation metadata and renders it as JSON,
//! Markdown or a self-contained HTML page.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use modmark_core::scoring::{Grade, ScoreSheet};

pub mod html;

pub use html::{generate_html, write_html_report};

/// A scored submission ready to hand back to a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackReport {
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Who or what the feedback is for (submission id, student name).
    #[serde(default)]
    pub subject: Option<String>,
    pub sheet: ScoreSheet,
}

/// Format a score without a trailing `.0`.
pub(crate) fn fmt_score(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

impl FeedbackReport {
    pub fn new(sheet: ScoreSheet, subject: Option<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            subject,
            sheet,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    pub fn to_markdown(&self) -> String {
        let sheet = &self.sheet;
        let mut md = String::new();

        md.push_str(&format!("## {}\n\n", sheet.rubric_title));
        if let Some(subject) = &self.subject {
            md.push_str(&format!("**Submission:** {subject}\n\n"));
        }
        md.push_str(&format!(
            "**Score:** {} / {} ({} of {} criteria graded)\n\n",
            fmt_score(sheet.total()),
            fmt_score(sheet.max_total()),
            sheet.graded_count(),
            sheet.criteria.len()
        ));

        md.push_str("| Criterion | Weight | Level | Score | Feedback |\n");
        md.push_str("|-----------|--------|-------|-------|----------|\n");
        for c in &sheet.criteria {
            match &c.grade {
                Grade::Graded {
                    level,
                    score,
                    description,
                } => md.push_str(&format!(
                    "| {} | {} | {} | {} / {} | {} |\n",
                    c.name,
                    fmt_score(c.weight),
                    level,
                    fmt_score(*score),
                    fmt_score(c.max_score),
                    description.replace('|', "\\|")
                )),
                Grade::NotGraded => md.push_str(&format!(
                    "| {} | {} | - | - / {} | Not graded |\n",
                    c.name,
                    fmt_score(c.weight),
                    fmt_score(c.max_score)
                )),
            }
        }

        if let Some(comment) = sheet.comment.as_deref().filter(|c| !c.trim().is_empty()) {
            md.push_str(&format!("\n**Comment:** {comment}\n"));
        }
        md
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use modmark_core::scoring::{CriterionScore, Grade, ScoreSheet};

    pub fn sample_sheet() -> ScoreSheet {
        ScoreSheet {
            rubric_title: "Lab <1>".into(),
            rubric_total: 20.0,
            criteria: vec![
                CriterionScore {
                    name: "Method".into(),
                    weight: 50.0,
                    max_score: 10.0,
                    grade: Grade::Graded {
                        level: 1,
                        score: 10.0,
                        description: "rigorous & complete".into(),
                    },
                },
                CriterionScore {
                    name: "Results".into(),
                    weight: 50.0,
                    max_score: 10.0,
                    grade: Grade::NotGraded,
                },
            ],
            comment: Some("See margin notes".into()),
        }
    }
}
