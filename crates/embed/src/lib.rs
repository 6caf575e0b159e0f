//! SemSort embedding backends
//!
//! Hugging Face inference API and local Ollama clients behind one trait

mod embedder;
mod huggingface;
mod ollama;
mod retry;
mod types;

pub use embedder::{build_embedder, Embedder};
pub use huggingface::HuggingFaceEmbedder;
pub use ollama::OllamaEmbedder;
pub use types::{HfEmbeddingRequest, HfEmbeddingResponse, OllamaEmbedRequest, OllamaEmbedResponse};
