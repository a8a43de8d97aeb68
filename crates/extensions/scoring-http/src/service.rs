//! `ScoringService` over the HTTP backend.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use greenchoice_config::BackendConfig;
use greenchoice_protocols::{
    ClassifyRequest, ClassifyResponse, ScoreRequestItem, ScoredItem, ScoringError, ScoringService,
};

use crate::api::{AlternativesRequest, AlternativesResponse};

const CLASSIFY_PATH: &str = "/classify";
const ALTERNATIVES_PATH: &str = "/alternatives";

/// Client for the sustainability scoring backend.
pub struct HttpScoringService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpScoringService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ScoringError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScoringError::Network(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, ScoringError> {
        Self::new(config.base_url.clone(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ScoringError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ScoringError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(ScoringError::ApiError { status, message: text });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ScoringError::Network(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| ScoringError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ScoringService for HttpScoringService {
    async fn classify(&self, request: &ClassifyRequest) -> Result<ClassifyResponse, ScoringError> {
        let response: ClassifyResponse = self.post(CLASSIFY_PATH, request).await?;
        debug!("Backend classified '{}' as {}/{}", request.title, response.category, response.gender);
        Ok(response)
    }

    async fn score(&self, products: &[ScoreRequestItem]) -> Result<Vec<ScoredItem>, ScoringError> {
        if products.is_empty() {
            return Ok(Vec::new());
        }
        let response: AlternativesResponse = self
            .post(ALTERNATIVES_PATH, &AlternativesRequest { products })
            .await?;
        debug!("Backend scored {} of {} products", response.alternatives.len(), products.len());
        Ok(response.alternatives)
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
