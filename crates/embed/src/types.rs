use serde::{Deserialize, Serialize};

/// Hugging Face embeddings request
#[derive(Debug, Clone, Serialize)]
pub struct HfEmbeddingRequest<'a> {
    /// Text to embed
    pub inputs: &'a str,
}

/// Hugging Face embeddings response
///
/// The inference API answers in several shapes depending on the endpoint and
/// model; all of them decode here and collapse into one vector.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HfEmbeddingResponse {
    /// `{"embedding": [...]}`
    Embedding { embedding: Vec<f32> },

    /// `{"data": [[...]]}`
    Data { data: Vec<Vec<f32>> },

    /// `[...]`
    Flat(Vec<f32>),

    /// `[[...], ...]`, one row per token
    Nested(Vec<Vec<f32>>),
}

impl HfEmbeddingResponse {
    /// Single sentence vector, or `None` if the payload holds no values
    pub fn into_vector(self) -> Option<Vec<f32>> {
        let vector = match self {
            Self::Embedding { embedding } => embedding,
            Self::Flat(values) => values,
            Self::Data { data } => data.into_iter().next()?,
            Self::Nested(rows) => mean_pool(rows)?,
        };

        if vector.is_empty() {
            None
        } else {
            Some(vector)
        }
    }
}

fn mean_pool(rows: Vec<Vec<f32>>) -> Option<Vec<f32>> {
    let count = rows.len();
    let mut rows = rows.into_iter();
    let mut sum = rows.next()?;
    for row in rows {
        if row.len() != sum.len() {
            return None;
        }
        for (acc, v) in sum.iter_mut().zip(row) {
            *acc += v;
        }
    }
    for acc in &mut sum {
        *acc /= count as f32;
    }
    Some(sum)
}

/// Ollama embedding request
#[derive(Debug, Clone, Serialize)]
pub struct OllamaEmbedRequest {
    /// Model name
    pub model: String,

    /// Text to embed
    pub prompt: String,
}

/// Ollama embedding response
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaEmbedResponse {
    /// Embedding vector
    pub embedding: Vec<f32>,
}
