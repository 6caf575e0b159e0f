use async_trait::async_trait;
use reqwest::Client;
use semsort_common::{Result, SemsortError};
use std::time::Duration;
use tracing::{debug, info};

use crate::embedder::Embedder;
use crate::retry::with_retry;
use crate::types::{HfEmbeddingRequest, HfEmbeddingResponse};

/// Hugging Face inference API embedding client
#[derive(Debug, Clone)]
pub struct HuggingFaceEmbedder {
    url: String,
    model_id: String,
    token: String,
    client: Client,
    max_attempts: u32,
}

impl HuggingFaceEmbedder {
    /// Create new client for `model_id` served under `base_url`
    pub fn new(
        base_url: &str,
        model_id: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let model_id = model_id.into();
        let url = format!("{}/embeddings/{}", base_url.trim_end_matches('/'), model_id);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SemsortError::network(format!("Failed to create HTTP client: {}", e)))?;

        info!("Hugging Face embedder initialized: {}", url);
        Ok(Self {
            url,
            model_id,
            token: token.into(),
            client,
            max_attempts: 1,
        })
    }

    /// Allow up to `max_attempts` calls per embedding
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    async fn try_embed(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&HfEmbeddingRequest { inputs: text })
            .send()
            .await
            .map_err(|e| SemsortError::network(format!("Failed to reach Hugging Face: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SemsortError::network(format!("Failed to read Hugging Face response: {}", e)))?;

        if status != reqwest::StatusCode::OK {
            return Err(SemsortError::embedding(format!(
                "Hugging Face API error {}: {}",
                status.as_u16(),
                body
            )));
        }

        serde_json::from_str::<HfEmbeddingResponse>(&body)
            .ok()
            .and_then(HfEmbeddingResponse::into_vector)
            .ok_or_else(|| {
                SemsortError::embedding(format!("Unexpected response format from Hugging Face: {}", body))
            })
    }
}

#[async_trait]
impl Embedder for HuggingFaceEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!("Requesting embedding - Model: {}, Text length: {}", self.model_id, text.len());

        let embedding = with_retry("Hugging Face embedding", self.max_attempts, || {
            self.try_embed(text)
        })
        .await?;

        debug!("Received embedding - Dimension: {}", embedding.len());
        Ok(embedding)
    }

    fn model(&self) -> &str {
        &self.model_id
    }
}
