//! Read-only scoring view of a graded submission.
//!
//! A grader's choices are stored as one selected level id per criterion. The
//! view resolves each choice against the rubric and reports either the level
//! that was picked or that the criterion has not been graded.

use serde::{Deserialize, Serialize};

use crate::payload::RubricDocument;

/// The grading record attached to a submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionGrades {
    #[serde(default)]
    pub rubric_scores: Vec<SelectedLevel>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// The level a grader selected for one criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedLevel {
    pub criterion: String,
    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Grade {
    Graded {
        level: u32,
        score: f64,
        description: String,
    },
    NotGraded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub name: String,
    pub weight: f64,
    /// Best score this criterion can award.
    pub max_score: f64,
    pub grade: Grade,
}

impl CriterionScore {
    pub fn score(&self) -> Option<f64> {
        match &self.grade {
            Grade::Graded { score, .. } => Some(*score),
            Grade::NotGraded => None,
        }
    }
}

/// Per-criterion feedback for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSheet {
    pub rubric_title: String,
    /// Total score configured on the rubric.
    pub rubric_total: f64,
    pub criteria: Vec<CriterionScore>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl ScoreSheet {
    /// Sum of the graded criteria.
    pub fn total(&self) -> f64 {
        self.criteria.iter().filter_map(CriterionScore::score).sum()
    }

    /// Sum of each criterion's best level.
    pub fn max_total(&self) -> f64 {
        self.criteria.iter().map(|c| c.max_score).sum()
    }

    pub fn graded_count(&self) -> usize {
        self.criteria.iter().filter(|c| c.score().is_some()).count()
    }

    pub fn is_fully_graded(&self) -> bool {
        self.graded_count() == self.criteria.len()
    }
}

/// Resolve a submission's selected levels against its rubric.
pub fn score_submission(rubric: &RubricDocument, grades: &SubmissionGrades) -> ScoreSheet {
    let criteria = rubric
        .criteria
        .iter()
        .map(|criterion| {
            let selected = criterion.id.as_deref().and_then(|cid| {
                grades
                    .rubric_scores
                    .iter()
                    .find(|s| s.criterion == cid)
                    .and_then(|s| s.level.as_deref())
            });

            let grade = selected
                .and_then(|level_id| {
                    criterion
                        .levels
                        .iter()
                        .find(|l| l.id.as_deref() == Some(level_id))
                })
                .map_or(Grade::NotGraded, |level| Grade::Graded {
                    level: level.level,
                    score: level.score,
                    description: level.description.clone(),
                });

            if grade == Grade::NotGraded && selected.is_some() {
                tracing::debug!(
                    criterion = %criterion.name,
                    "selected level not found in rubric, showing as not graded"
                );
            }

            CriterionScore {
                name: criterion.name.clone(),
                weight: criterion.weight,
                max_score: criterion.max_score(),
                grade,
            }
        })
        .collect();

    ScoreSheet {
        rubric_title: rubric.title.clone(),
        rubric_total: rubric.score,
        criteria,
        comment: grades.comment.clone(),
    }
}
