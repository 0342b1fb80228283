//! REST implementation of the rubric store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::instrument;

use modmark_core::payload::{RubricCreateRequest, RubricDocument};
use modmark_core::traits::{AuthTokenProvider, RubricStore};

use crate::config::ModmarkConfig;
use crate::error::ClientError;

/// Rubric store backed by the grading backend's `/rubric` routes.
pub struct HttpRubricStore {
    base_url: String,
    timeout_secs: u64,
    auth: Arc<dyn AuthTokenProvider>,
    client: reqwest::Client,
}

impl HttpRubricStore {
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        auth: Arc<dyn AuthTokenProvider>,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
            auth,
            client,
        })
    }

    pub fn from_config(config: &ModmarkConfig) -> Result<Self, ClientError> {
        Self::new(&config.base_url, config.timeout_secs, config.auth_provider())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer token, send, and map failures.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<reqwest::Response, ClientError> {
        let token = self.auth.token().ok_or(ClientError::MissingToken)?;

        let response = request.bearer_auth(token).send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                ClientError::Network(format!("backend not reachable at {}", self.base_url))
            } else {
                ClientError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        match status {
            401 | 403 => {
                let body = response.text().await.unwrap_or_default();
                Err(ClientError::Unauthorized(if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body
                }))
            }
            404 => Err(ClientError::NotFound(what.to_string())),
            s if s >= 400 => {
                let body = response.text().await.unwrap_or_default();
                Err(ClientError::Api {
                    status,
                    message: body,
                })
            }
            _ => Ok(response),
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RubricStore for HttpRubricStore {
    #[instrument(skip(self))]
    async fn list_for_section(&self, section_id: &str) -> anyhow::Result<Vec<RubricDocument>> {
        let response = self
            .send(
                self.client
                    .get(self.url(&format!("/rubric/section/{section_id}"))),
                &format!("section {section_id}"),
            )
            .await?;
        let rubrics: Vec<RubricDocument> = Self::decode(response).await?;
        tracing::debug!(count = rubrics.len(), "listed rubrics");
        Ok(rubrics)
    }

    #[instrument(skip(self))]
    async fn get(&self, rubric_id: &str) -> anyhow::Result<RubricDocument> {
        let response = self
            .send(
                self.client.get(self.url(&format!("/rubric/{rubric_id}"))),
                &format!("rubric {rubric_id}"),
            )
            .await?;
        Ok(Self::decode(response).await?)
    }

    #[instrument(skip(self, request), fields(title = %request.title))]
    async fn create(&self, request: &RubricCreateRequest) -> anyhow::Result<RubricDocument> {
        let response = self
            .send(
                self.client.post(self.url("/rubric/create")).json(request),
                "rubric create route",
            )
            .await?;
        let doc: RubricDocument = Self::decode(response).await?;
        tracing::info!(id = %doc.id, "created rubric");
        Ok(doc)
    }

    #[instrument(skip(self, request), fields(title = %request.title))]
    async fn update(
        &self,
        rubric_id: &str,
        request: &RubricCreateRequest,
    ) -> anyhow::Result<RubricDocument> {
        let response = self
            .send(
                self.client
                    .put(self.url(&format!("/rubric/update/{rubric_id}")))
                    .json(request),
                &format!("rubric {rubric_id}"),
            )
            .await?;
        Ok(Self::decode(response).await?)
    }

    #[instrument(skip(self))]
    async fn delete(&self, rubric_id: &str) -> anyhow::Result<()> {
        self.send(
            self.client
                .delete(self.url(&format!("/rubric/delete/{rubric_id}"))),
            &format!("rubric {rubric_id}"),
        )
        .await?;
        tracing::info!("deleted rubric");
        Ok(())
    }
}
