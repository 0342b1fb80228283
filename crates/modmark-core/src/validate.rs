//! Field-level validation run before a rubric is submitted.

use std::fmt;

use serde::Serialize;

use crate::model::{NumericInput, RubricMatrix};

/// Location of a form field inside the rubric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldPath {
    Title,
    TotalScore,
    Criteria,
    CriterionName { row: usize },
    Weight { row: usize },
    CellScore { row: usize, column: usize },
    CellDescription { row: usize, column: usize },
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Title => write!(f, "title"),
            FieldPath::TotalScore => write!(f, "totalScore"),
            FieldPath::Criteria => write!(f, "criteria"),
            FieldPath::CriterionName { row } => write!(f, "criteria[{row}].name"),
            FieldPath::Weight { row } => write!(f, "criteria[{row}].weight"),
            FieldPath::CellScore { row, column } => {
                write!(f, "criteria[{row}].levels[{column}].score")
            }
            FieldPath::CellDescription { row, column } => {
                write!(f, "criteria[{row}].levels[{column}].description")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks submit.
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: FieldPath,
    pub severity: Severity,
    pub message: String,
}

impl FieldError {
    fn error(field: FieldPath, message: impl Into<String>) -> Self {
        Self {
            field,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(field: FieldPath, message: impl Into<String>) -> Self {
        Self {
            field,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{label}: {}: {}", self.field, self.message)
    }
}

/// Check a numeric field: blank is allowed (it is sent as 0), anything else
/// must be a non-negative number.
fn check_numeric(input: &NumericInput, field: FieldPath, what: &str, out: &mut Vec<FieldError>) {
    if input.is_blank() {
        return;
    }
    match input.value() {
        None => out.push(FieldError::error(
            field,
            format!("{what} must be a number, got {:?}", input.as_str()),
        )),
        Some(v) if v < 0.0 => {
            out.push(FieldError::error(field, format!("{what} cannot be negative")))
        }
        Some(_) => {}
    }
}

/// Validate a matrix for submit. Returns errors and warnings in field order.
pub fn validate_matrix(matrix: &RubricMatrix) -> Vec<FieldError> {
    let mut problems = Vec::new();

    if matrix.title.trim().is_empty() {
        problems.push(FieldError::error(FieldPath::Title, "title is required"));
    }
    check_numeric(
        &matrix.total_score,
        FieldPath::TotalScore,
        "total score",
        &mut problems,
    );

    if matrix.rows().is_empty() {
        problems.push(FieldError::error(
            FieldPath::Criteria,
            "a rubric needs at least one criterion",
        ));
    }

    for (r, row) in matrix.rows().iter().enumerate() {
        if row.criteria_name.trim().is_empty() {
            problems.push(FieldError::error(
                FieldPath::CriterionName { row: r },
                "criterion name is required",
            ));
        }
        check_numeric(
            &row.weight,
            FieldPath::Weight { row: r },
            "weight",
            &mut problems,
        );

        for (c, cell) in row.cells().iter().enumerate() {
            check_numeric(
                &cell.score,
                FieldPath::CellScore { row: r, column: c },
                "level score",
                &mut problems,
            );
            if cell.description.trim().is_empty() {
                problems.push(FieldError::warning(
                    FieldPath::CellDescription { row: r, column: c },
                    "level has no description",
                ));
            }
        }
    }

    problems
}

/// Whether any of the problems blocks submit.
pub fn has_errors(problems: &[FieldError]) -> bool {
    problems.iter().any(FieldError::is_error)
}
