//! Error types for rubric editing, import and shape mapping.
//!
//! Import errors always carry the 1-based sheet row they were raised on so the
//! user can find the offending line in their spreadsheet.

use thiserror::Error;

/// Errors raised by matrix editor operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// A rubric must keep at least one level.
    #[error("cannot remove the last remaining level")]
    LastColumn,

    #[error("level index {index} out of range ({len} levels)")]
    ColumnOutOfRange { index: usize, len: usize },

    #[error("criterion index {index} out of range ({len} criteria)")]
    RowOutOfRange { index: usize, len: usize },

    /// The session is waiting for the backend and does not accept edits.
    #[error("rubric is being submitted, edits are disabled until it completes")]
    SubmitInFlight,

    #[error("no submit is in flight")]
    NotSubmitting,
}

/// Errors raised when a spreadsheet does not have the rubric row layout.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("sheet is empty, expected a header row")]
    MissingHeader,

    #[error("sheet has a header but no data rows")]
    NoDataRows,

    #[error("row {row}: expected at least {expected} columns, found {found}")]
    TooFewColumns {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}, column {column}: {field} must be numeric, found {value:?}")]
    NotNumeric {
        row: usize,
        column: usize,
        field: &'static str,
        value: String,
    },

    #[error("row {row}, column {column}: level score has no description cell")]
    MissingDescription { row: usize, column: usize },

    #[error("row {row}: criterion name is empty")]
    EmptyCriterion { row: usize },

    #[error("row {row}: expected {expected} levels like the first criterion, found {found}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unsupported sheet format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to read sheet {path}: {message}")]
    Read { path: String, message: String },
}

impl ParseError {
    /// The 1-based sheet row the error points at, if any.
    pub fn row(&self) -> Option<usize> {
        match self {
            ParseError::TooFewColumns { row, .. }
            | ParseError::NotNumeric { row, .. }
            | ParseError::MissingDescription { row, .. }
            | ParseError::EmptyCriterion { row }
            | ParseError::RaggedRow { row, .. } => Some(*row),
            _ => None,
        }
    }
}

/// Errors raised when a rubric document or matrix file is not rectangular.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("criterion {criterion} ({name:?}) has {found} levels, expected {expected}")]
    Ragged {
        criterion: usize,
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("criterion {criterion} ({name:?}) has no levels")]
    NoLevels { criterion: usize, name: String },

    #[error("rubric must have at least one level")]
    NoColumns,

    #[error("criterion {row} has {cells} cells but the rubric has {columns} levels")]
    NotRectangular {
        row: usize,
        cells: usize,
        columns: usize,
    },
}
