//! Rubric editor session.
//!
//! Owns the matrix for one open create or edit form and tracks where the form
//! is in its lifecycle:
//!
//! ```text
//! Empty --edit--> Editing --begin_submit--> Submitting --ok--> Empty
//!   |               ^                           |
//!   +--import-------+<----------err-------------+
//! ```
//!
//! Edits and imports are refused while a submit is in flight so the payload
//! on the wire always matches what the user sees.

use thiserror::Error;

use crate::error::{EditError, ShapeError};
use crate::model::RubricMatrix;
use crate::payload::{from_response, to_payload, RubricCreateRequest, RubricDocument};
use crate::traits::RubricStore;
use crate::validate::{has_errors, validate_matrix, FieldError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Empty,
    Editing,
    Submitting,
}

/// Why a submit did not go through.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("a submit is already in flight")]
    InFlight,

    #[error("rubric has {} invalid field(s)", .0.iter().filter(|e| e.is_error()).count())]
    Invalid(Vec<FieldError>),

    #[error("backend rejected the rubric: {0:#}")]
    Store(anyhow::Error),
}

/// A payload handed out by [`EditorSession::begin_submit`].
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmit {
    /// `Some` when updating an existing rubric.
    pub rubric_id: Option<String>,
    pub request: RubricCreateRequest,
}

#[derive(Debug, Clone)]
pub struct EditorSession {
    matrix: RubricMatrix,
    state: EditorState,
    rubric_id: Option<String>,
    section_id: Option<String>,
    last_error: Option<String>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    /// Start the create flow with an empty matrix.
    pub fn new() -> Self {
        Self {
            matrix: RubricMatrix::empty(),
            state: EditorState::Empty,
            rubric_id: None,
            section_id: None,
            last_error: None,
        }
    }

    /// Start the create flow for a section.
    pub fn for_section(section_id: impl Into<String>) -> Self {
        Self {
            section_id: Some(section_id.into()),
            ..Self::new()
        }
    }

    /// Start the edit flow from a persisted rubric.
    pub fn load(doc: &RubricDocument) -> Result<Self, ShapeError> {
        Ok(Self {
            matrix: from_response(doc)?,
            state: EditorState::Editing,
            rubric_id: Some(doc.id.clone()),
            section_id: doc.section.clone(),
            last_error: None,
        })
    }

    pub fn matrix(&self) -> &RubricMatrix {
        &self.matrix
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn rubric_id(&self) -> Option<&str> {
        self.rubric_id.as_deref()
    }

    /// Message of the last failed submit, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Apply an edit to the matrix.
    pub fn edit<T>(
        &mut self,
        f: impl FnOnce(&mut RubricMatrix) -> Result<T, EditError>,
    ) -> Result<T, EditError> {
        if self.state == EditorState::Submitting {
            return Err(EditError::SubmitInFlight);
        }
        let out = f(&mut self.matrix)?;
        self.state = EditorState::Editing;
        Ok(out)
    }

    /// Replace the whole matrix with an imported one.
    pub fn import(&mut self, matrix: RubricMatrix) -> Result<(), EditError> {
        if self.state == EditorState::Submitting {
            return Err(EditError::SubmitInFlight);
        }
        tracing::debug!(
            rows = matrix.row_count(),
            columns = matrix.column_count(),
            "replacing matrix with imported rubric"
        );
        self.matrix = matrix;
        self.state = EditorState::Editing;
        Ok(())
    }

    /// Validate the matrix and freeze the session until the submit finishes.
    pub fn begin_submit(&mut self) -> Result<PendingSubmit, SubmitError> {
        if self.state == EditorState::Submitting {
            return Err(SubmitError::InFlight);
        }
        let problems = validate_matrix(&self.matrix);
        if has_errors(&problems) {
            return Err(SubmitError::Invalid(problems));
        }

        let mut request = to_payload(&self.matrix);
        if self.rubric_id.is_none() {
            request.section = self.section_id.clone();
        }
        self.state = EditorState::Submitting;
        Ok(PendingSubmit {
            rubric_id: self.rubric_id.clone(),
            request,
        })
    }

    /// Record the outcome of the submit started by `begin_submit`.
    ///
    /// Success resets the form to an empty matrix; failure keeps the matrix so
    /// the user can retry.
    pub fn finish_submit(&mut self, outcome: Result<(), String>) -> Result<(), EditError> {
        if self.state != EditorState::Submitting {
            return Err(EditError::NotSubmitting);
        }
        match outcome {
            Ok(()) => {
                let section_id = if self.rubric_id.is_none() {
                    self.section_id.take()
                } else {
                    None
                };
                *self = Self {
                    section_id,
                    ..Self::new()
                };
            }
            Err(message) => {
                tracing::warn!("rubric submit failed: {message}");
                self.last_error = Some(message);
                self.state = EditorState::Editing;
            }
        }
        Ok(())
    }

    /// Validate, send to the store and record the outcome.
    pub async fn submit(&mut self, store: &dyn RubricStore) -> Result<RubricDocument, SubmitError> {
        let pending = self.begin_submit()?;
        let result = match &pending.rubric_id {
            Some(id) => store.update(id, &pending.request).await,
            None => store.create(&pending.request).await,
        };

        match result {
            Ok(doc) => {
                self.finish_submit(Ok(()))
                    .map_err(|e| SubmitError::Store(e.into()))?;
                Ok(doc)
            }
            Err(e) => {
                self.finish_submit(Err(format!("{e:#}")))
                    .map_err(|e| SubmitError::Store(e.into()))?;
                Err(SubmitError::Store(e))
            }
        }
    }
}
