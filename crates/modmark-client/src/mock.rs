//! In-memory rubric store for testing.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use modmark_core::payload::{
    CriterionDocument, LevelDocument, RubricCreateRequest, RubricDocument,
};
use modmark_core::traits::RubricStore;

use crate::error::ClientError;

/// A rubric store that keeps documents in memory and assigns sequential ids.
///
/// Criterion and level ids are derived from the rubric id
/// (`r1-c0`, `r1-c0-l1`) so tests can build matching grades.
#[derive(Default)]
pub struct MockRubricStore {
    rubrics: Mutex<BTreeMap<String, RubricDocument>>,
    next_id: AtomicU32,
    /// When set, every call fails with a 500.
    failing: AtomicBool,
    call_count: AtomicU32,
}

impl MockRubricStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent calls fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Get the number of calls made to this store.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Seed a document directly.
    pub fn insert(&self, doc: RubricDocument) {
        self.rubrics.lock().unwrap().insert(doc.id.clone(), doc);
    }

    fn begin_call(&self) -> Result<(), ClientError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if self.failing.load(Ordering::Relaxed) {
            return Err(ClientError::Api {
                status: 500,
                message: "mock store failure".into(),
            });
        }
        Ok(())
    }
}

/// Build the document the backend would store for a request.
pub fn document_from_request(id: &str, request: &RubricCreateRequest) -> RubricDocument {
    RubricDocument {
        id: id.to_string(),
        title: request.title.clone(),
        description: request.description.clone(),
        score: request.score,
        section: request.section.clone(),
        criteria: request
            .criteria
            .iter()
            .enumerate()
            .map(|(c, criterion)| CriterionDocument {
                id: Some(format!("{id}-c{c}")),
                name: criterion.name.clone(),
                weight: criterion.weight,
                levels: criterion
                    .levels
                    .iter()
                    .map(|level| LevelDocument {
                        id: Some(format!("{id}-c{c}-l{}", level.level)),
                        level: level.level,
                        description: level.description.clone(),
                        score: level.score,
                    })
                    .collect(),
            })
            .collect(),
    }
}

#[async_trait]
impl RubricStore for MockRubricStore {
    async fn list_for_section(&self, section_id: &str) -> anyhow::Result<Vec<RubricDocument>> {
        self.begin_call()?;
        Ok(self
            .rubrics
            .lock()
            .unwrap()
            .values()
            .filter(|doc| doc.section.as_deref() == Some(section_id))
            .cloned()
            .collect())
    }

    async fn get(&self, rubric_id: &str) -> anyhow::Result<RubricDocument> {
        self.begin_call()?;
        self.rubrics
            .lock()
            .unwrap()
            .get(rubric_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("rubric {rubric_id}")).into())
    }

    async fn create(&self, request: &RubricCreateRequest) -> anyhow::Result<RubricDocument> {
        self.begin_call()?;
        let id = format!("r{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let doc = document_from_request(&id, request);
        self.insert(doc.clone());
        Ok(doc)
    }

    async fn update(
        &self,
        rubric_id: &str,
        request: &RubricCreateRequest,
    ) -> anyhow::Result<RubricDocument> {
        self.begin_call()?;
        let mut rubrics = self.rubrics.lock().unwrap();
        let existing = rubrics
            .get_mut(rubric_id)
            .ok_or_else(|| ClientError::NotFound(format!("rubric {rubric_id}")))?;
        let section = existing.section.clone();
        *existing = document_from_request(rubric_id, request);
        existing.section = section;
        Ok(existing.clone())
    }

    async fn delete(&self, rubric_id: &str) -> anyhow::Result<()> {
        self.begin_call()?;
        self.rubrics
            .lock()
            .unwrap()
            .remove(rubric_id)
            .map(|_| ())
            .ok_or_else(|| ClientError::NotFound(format!("rubric {rubric_id}")).into())
    }
}
