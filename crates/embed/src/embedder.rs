use async_trait::async_trait;
use semsort_common::{AppConfig, EmbeddingBackend, Result};
use std::sync::Arc;
use std::time::Duration;

use crate::huggingface::HuggingFaceEmbedder;
use crate::ollama::OllamaEmbedder;

/// Common trait for embedding backends
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Compute the embedding of `text`
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Model name, for display
    fn model(&self) -> &str;
}

/// Build the embedder selected by `config`
pub fn build_embedder(config: &AppConfig) -> Result<Arc<dyn Embedder>> {
    let timeout = Duration::from_secs(config.http_timeout_secs);

    let embedder: Arc<dyn Embedder> = match config.embedding_backend {
        EmbeddingBackend::HuggingFace => {
            let token = config.hf_api_token.clone().ok_or_else(|| {
                semsort_common::SemsortError::config("HF_API_TOKEN is not set")
            })?;
            Arc::new(
                HuggingFaceEmbedder::new(&config.hf_base_url, &config.hf_model_id, token, timeout)?
                    .with_max_attempts(config.embed_max_attempts),
            )
        }
        EmbeddingBackend::Ollama => Arc::new(
            OllamaEmbedder::new(&config.ollama_base_url, &config.embedding_model, timeout)?
                .with_max_attempts(config.embed_max_attempts),
        ),
    };

    Ok(embedder)
}
