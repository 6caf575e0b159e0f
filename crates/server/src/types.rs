use chrono::{DateTime, Utc};
use semsort_vector::{Entry, RankedEntry};
use serde::{Deserialize, Serialize};

/// Single-field submission
#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub user_text: String,
}

/// Two sub-fields composed into the template sentence
#[derive(Debug, Deserialize)]
pub struct ComposeForm {
    #[serde(default)]
    pub first: String,

    #[serde(default)]
    pub second: String,
}

/// Query selection
#[derive(Debug, Deserialize)]
pub struct SelectForm {
    pub query_id: i64,
}

/// Entry without its embedding
#[derive(Debug, Serialize)]
pub struct EntrySummary {
    pub id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Entry> for EntrySummary {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id,
            text: entry.text.clone(),
            created_at: entry.created_at,
        }
    }
}

/// Ranking response
#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub query_id: i64,
    pub results: Vec<RankedEntry>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub embedding_model: String,
}
