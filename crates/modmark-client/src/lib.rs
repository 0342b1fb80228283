//! modmark-client: rubric backend integration.
//!
//! Implements the `RubricStore` trait over the backend's REST API, plus the
//! configuration and auth token sources the CLI wires into it.

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod mock;

pub use auth::{EnvToken, StaticToken};
pub use config::{load_config, ModmarkConfig};
pub use error::ClientError;
pub use http::HttpRubricStore;
