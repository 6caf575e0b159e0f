use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored text entry with its embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Store-assigned identifier
    pub id: i64,

    /// Submitted text
    pub text: String,

    /// Embedding computed once at creation
    pub embedding: Vec<f32>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Insert payload; id and timestamp are assigned by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    pub text: String,
    pub embedding: Vec<f32>,
}

impl NewEntry {
    pub fn new(text: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            text: text.into(),
            embedding,
        }
    }
}

/// One row of a ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    /// Entry ID
    pub id: i64,

    /// Entry text
    pub text: String,

    /// Cosine similarity to the query; `None` for the query itself
    pub score: Option<f32>,
}

impl RankedEntry {
    /// The query row heading a ranking
    pub fn anchor(entry: &Entry) -> Self {
        Self {
            id: entry.id,
            text: entry.text.clone(),
            score: None,
        }
    }

    pub fn scored(entry: &Entry, score: f32) -> Self {
        Self {
            id: entry.id,
            text: entry.text.clone(),
            score: Some(score),
        }
    }

    pub fn is_anchor(&self) -> bool {
        self.score.is_none()
    }
}
