//! Rubric matrix data model.
//!
//! A rubric is edited as a grid: columns are performance levels, rows are
//! criteria, and every row holds exactly one cell per column. The grid
//! fields are crate-private so only the editor operations in
//! [`crate::editor`] can change the shape.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ShapeError;

/// A numeric form field holding the raw user input.
///
/// Scores and weights are typed into free-text fields, so the matrix keeps
/// the text as entered. [`NumericInput::value`] is the strict reading used by
/// validation, [`NumericInput::or_zero`] the lenient one used when building
/// the backend payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawNumericInput", into = "String")]
pub struct NumericInput(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumericInput {
    Text(String),
    Number(f64),
}

impl From<RawNumericInput> for NumericInput {
    fn from(raw: RawNumericInput) -> Self {
        match raw {
            RawNumericInput::Text(s) => NumericInput(s),
            RawNumericInput::Number(n) => NumericInput::from_number(n),
        }
    }
}

impl From<NumericInput> for String {
    fn from(input: NumericInput) -> Self {
        input.0
    }
}

impl From<&str> for NumericInput {
    fn from(s: &str) -> Self {
        NumericInput(s.to_string())
    }
}

impl From<String> for NumericInput {
    fn from(s: String) -> Self {
        NumericInput(s)
    }
}

impl From<f64> for NumericInput {
    fn from(n: f64) -> Self {
        NumericInput::from_number(n)
    }
}

impl NumericInput {
    pub fn new(raw: impl Into<String>) -> Self {
        NumericInput(raw.into())
    }

    /// Render a number the way it would be typed (`20`, not `20.0`).
    pub fn from_number(n: f64) -> Self {
        NumericInput(n.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Parse the input; `None` for blank, non-numeric or non-finite text.
    pub fn value(&self) -> Option<f64> {
        let trimmed = self.0.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// The payload coercion: anything that is not a finite number becomes 0.
    pub fn or_zero(&self) -> f64 {
        self.value().unwrap_or(0.0)
    }
}

impl fmt::Display for NumericInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One level column. `level` is 1-based and always equals position + 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub level: u32,
}

/// One description/score pair at the intersection of a criterion and a level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub score: NumericInput,
}

impl Cell {
    pub fn new(description: impl Into<String>, score: impl Into<NumericInput>) -> Self {
        Self {
            description: description.into(),
            score: score.into(),
        }
    }
}

/// A criterion row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    #[serde(default)]
    pub criteria_name: String,
    #[serde(default)]
    pub weight: NumericInput,
    #[serde(default)]
    pub(crate) cells: Vec<Cell>,
}

impl Row {
    /// A blank criterion with `columns` empty cells.
    pub(crate) fn blank(columns: usize) -> Self {
        Self {
            criteria_name: String::new(),
            weight: NumericInput::default(),
            cells: vec![Cell::default(); columns],
        }
    }

    pub(crate) fn with_cells(
        criteria_name: impl Into<String>,
        weight: NumericInput,
        cells: Vec<Cell>,
    ) -> Self {
        Self {
            criteria_name: criteria_name.into(),
            weight,
            cells,
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// The editable rubric grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawMatrix")]
pub struct RubricMatrix {
    pub title: String,
    pub description: String,
    pub total_score: NumericInput,
    pub(crate) columns: Vec<Column>,
    pub(crate) rows: Vec<Row>,
}

/// Unchecked shape used to validate matrix files on load.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMatrix {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    total_score: NumericInput,
    #[serde(default)]
    columns: Vec<Column>,
    #[serde(default)]
    rows: Vec<Row>,
}

impl TryFrom<RawMatrix> for RubricMatrix {
    type Error = ShapeError;

    fn try_from(raw: RawMatrix) -> Result<Self, Self::Error> {
        let mut matrix = RubricMatrix {
            title: raw.title,
            description: raw.description,
            total_score: raw.total_score,
            columns: raw.columns,
            rows: raw.rows,
        };
        matrix.check_shape()?;
        matrix.renumber_levels();
        Ok(matrix)
    }
}

impl Default for RubricMatrix {
    fn default() -> Self {
        Self::empty()
    }
}

impl RubricMatrix {
    /// The starting state of the create form: one level, one blank criterion.
    pub fn empty() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            total_score: NumericInput::default(),
            columns: vec![Column { level: 1 }],
            rows: vec![Row::blank(1)],
        }
    }

    /// Build a matrix from already-shaped rows.
    pub(crate) fn from_rows(
        title: impl Into<String>,
        description: impl Into<String>,
        total_score: NumericInput,
        column_count: usize,
        rows: Vec<Row>,
    ) -> Result<Self, ShapeError> {
        let matrix = Self {
            title: title.into(),
            description: description.into(),
            total_score,
            columns: (1..=column_count as u32)
                .map(|level| Column { level })
                .collect(),
            rows,
        };
        matrix.check_shape()?;
        Ok(matrix)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.cells.get(column))
    }

    /// Whether every row has one cell per column.
    pub fn is_rectangular(&self) -> bool {
        self.rows.iter().all(|r| r.cells.len() == self.columns.len())
    }

    fn check_shape(&self) -> Result<(), ShapeError> {
        if self.columns.is_empty() {
            return Err(ShapeError::NoColumns);
        }
        for (i, row) in self.rows.iter().enumerate() {
            if row.cells.len() != self.columns.len() {
                return Err(ShapeError::NotRectangular {
                    row: i,
                    cells: row.cells.len(),
                    columns: self.columns.len(),
                });
            }
        }
        Ok(())
    }

    pub(crate) fn renumber_levels(&mut self) {
        for (i, column) in self.columns.iter_mut().enumerate() {
            column.level = i as u32 + 1;
        }
    }
}
