use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use semsort_vector::Entry;

/// Row of the `entries` table as PostgREST returns it
#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseRow {
    pub id: i64,
    pub text: String,
    #[serde(deserialize_with = "deserialize_embedding")]
    pub embedding: Vec<f32>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl From<SupabaseRow> for Entry {
    fn from(row: SupabaseRow) -> Self {
        Entry {
            id: row.id,
            text: row.text,
            embedding: row.embedding,
            created_at: row.created_at,
        }
    }
}

/// PostgREST error body
#[derive(Debug, Clone, Deserialize)]
pub struct PostgrestError {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

/// `float8[]`/`jsonb` columns arrive as arrays, pgvector columns as `"[1,2,3]"`
fn deserialize_embedding<'de, D>(deserializer: D) -> Result<Vec<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Column {
        Values(Vec<f32>),
        Text(String),
    }

    match Column::deserialize(deserializer)? {
        Column::Values(values) => Ok(values),
        Column::Text(text) => parse_vector_literal(&text).map_err(serde::de::Error::custom),
    }
}

/// `timestamptz` columns carry an offset; plain `timestamp` columns are read as UTC
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_timestamp(&text).map_err(serde::de::Error::custom)
}

pub(crate) fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, String> {
    let text = text.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Ok(ts.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| format!("invalid timestamp: {}", text))
}

pub(crate) fn parse_vector_literal(text: &str) -> Result<Vec<f32>, String> {
    let inner = text
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| format!("invalid vector literal: {}", text))?;

    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    inner
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<f32>()
                .map_err(|e| format!("invalid vector component '{}': {}", v.trim(), e))
        })
        .collect()
}
