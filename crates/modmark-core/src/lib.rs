//! modmark-core: rubric matrix model, editing, import and scoring.
//!
//! This crate defines the in-memory rubric matrix that professors edit, the
//! adapters that move it to and from spreadsheets and the backend document
//! shape, and the read-only scoring view used for submission feedback.

pub mod editor;
pub mod error;
pub mod import;
pub mod model;
pub mod payload;
pub mod scoring;
pub mod session;
pub mod traits;
pub mod validate;

pub use error::{EditError, ParseError, ShapeError};
pub use model::{Cell, Column, NumericInput, Row, RubricMatrix};
