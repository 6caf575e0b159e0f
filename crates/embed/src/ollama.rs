use async_trait::async_trait;
use reqwest::Client;
use semsort_common::{Result, SemsortError};
use std::time::Duration;
use tracing::{debug, info};

use crate::embedder::Embedder;
use crate::retry::with_retry;
use crate::types::{OllamaEmbedRequest, OllamaEmbedResponse};

/// Embedding client for a locally served Ollama model
#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    base_url: String,
    model: String,
    client: Client,
    max_attempts: u32,
}

impl OllamaEmbedder {
    /// Create new Ollama embedder
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SemsortError::network(format!("Failed to create HTTP client: {}", e)))?;

        info!("Ollama embedder initialized: {}", base_url);
        Ok(Self {
            base_url,
            model: model.into(),
            client,
            max_attempts: 1,
        })
    }

    /// Allow up to `max_attempts` calls per embedding
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Test connection to Ollama
    pub async fn test_connection(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SemsortError::network(format!("Failed to connect to Ollama: {}", e)))?;
        Ok(response.status().is_success())
    }

    /// Single attempt to generate embedding
    async fn try_embed(&self, request: &OllamaEmbedRequest) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| SemsortError::network(format!("Failed to send embedding request: {}", e)))?
            .error_for_status()
            .map_err(|e| SemsortError::embedding(format!("Ollama embedding API error: {}", e)))?;

        let result: OllamaEmbedResponse = response
            .json()
            .await
            .map_err(|e| SemsortError::embedding(format!("Failed to parse embedding response: {}", e)))?;

        if result.embedding.is_empty() {
            return Err(SemsortError::embedding("Empty embedding from Ollama"));
        }

        Ok(result.embedding)
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!("Generating embedding - Model: {}, Text length: {}", self.model, text.len());

        let request = OllamaEmbedRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
        };

        let embedding =
            with_retry("Ollama embedding", self.max_attempts, || self.try_embed(&request)).await?;

        debug!("Received embedding - Dimension: {}", embedding.len());
        Ok(embedding)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
