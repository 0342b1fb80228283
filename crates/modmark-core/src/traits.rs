//! Seams to the outside world: the auth token source and the rubric backend.
//!
//! `modmark-client` provides the HTTP and in-memory implementations.

use async_trait::async_trait;

use crate::payload::{RubricCreateRequest, RubricDocument};

/// Source of the bearer token for the current user.
///
/// Session handling lives outside this crate; the rubric code only needs to
/// ask for the current token.
pub trait AuthTokenProvider: Send + Sync {
    /// The current token, or `None` when nobody is signed in.
    fn token(&self) -> Option<String>;
}

/// Durable rubric storage.
#[async_trait]
pub trait RubricStore: Send + Sync {
    /// All rubrics owned by a course section.
    async fn list_for_section(&self, section_id: &str) -> anyhow::Result<Vec<RubricDocument>>;

    async fn get(&self, rubric_id: &str) -> anyhow::Result<RubricDocument>;

    async fn create(&self, request: &RubricCreateRequest) -> anyhow::Result<RubricDocument>;

    async fn update(
        &self,
        rubric_id: &str,
        request: &RubricCreateRequest,
    ) -> anyhow::Result<RubricDocument>;

    async fn delete(&self, rubric_id: &str) -> anyhow::Result<()>;
}
