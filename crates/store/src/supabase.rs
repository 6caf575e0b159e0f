use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use semsort_common::{Result, SemsortError};
use semsort_vector::{Entry, NewEntry};
use std::time::Duration;
use tracing::{debug, info};

use crate::store::EntryStore;
use crate::types::{PostgrestError, SupabaseRow};

const COLUMNS: &str = "id,text,embedding,created_at";

/// Entries table in a Supabase project, through its PostgREST endpoint
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    table_url: String,
    api_key: String,
    client: Client,
}

impl SupabaseStore {
    /// Create new store for `table` in the project at `url`
    pub fn new(url: &str, api_key: impl Into<String>, table: &str, timeout: Duration) -> Result<Self> {
        let table_url = format!("{}/rest/v1/{}", url.trim_end_matches('/'), table);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SemsortError::network(format!("Failed to create HTTP client: {}", e)))?;

        info!("Supabase store initialized: {}", table_url);
        Ok(Self {
            table_url,
            api_key: api_key.into(),
            client,
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Send and decode into rows, or a store error carrying the PostgREST message
    async fn fetch_rows(&self, request: RequestBuilder) -> Result<Vec<Entry>> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| SemsortError::network(format!("Failed to reach Supabase: {}", e)))?;

        decode_rows(response).await
    }
}

async fn decode_rows(response: Response) -> Result<Vec<Entry>> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| SemsortError::network(format!("Failed to read Supabase response: {}", e)))?;

    if !status.is_success() {
        let message = serde_json::from_str::<PostgrestError>(&body)
            .map(|e| e.message)
            .unwrap_or(body);
        return Err(SemsortError::store(format!(
            "Supabase error {}: {}",
            status.as_u16(),
            message
        )));
    }

    let rows: Vec<SupabaseRow> = serde_json::from_str(&body)
        .map_err(|e| SemsortError::store(format!("Unexpected Supabase response: {}", e)))?;

    Ok(rows.into_iter().map(Entry::from).collect())
}

#[async_trait]
impl EntryStore for SupabaseStore {
    async fn list(&self) -> Result<Vec<Entry>> {
        let request = self.client.get(&self.table_url).query(&[
            ("select", COLUMNS),
            ("order", "created_at.asc,id.asc"),
        ]);

        let entries = self.fetch_rows(request).await?;
        debug!("Fetched {} entries from Supabase", entries.len());
        Ok(entries)
    }

    async fn insert(&self, entry: NewEntry) -> Result<Entry> {
        let request = self
            .client
            .post(&self.table_url)
            .query(&[("select", COLUMNS)])
            .header("Prefer", "return=representation")
            .json(&entry);

        let entry = self
            .fetch_rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SemsortError::store("Supabase returned no row for insert"))?;

        info!("Inserted entry {} ({} chars)", entry.id, entry.text.len());
        Ok(entry)
    }

    async fn get(&self, id: i64) -> Result<Option<Entry>> {
        let filter = format!("eq.{}", id);
        let request = self
            .client
            .get(&self.table_url)
            .query(&[("select", COLUMNS), ("id", filter.as_str())]);

        Ok(self.fetch_rows(request).await?.into_iter().next())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let filter = format!("eq.{}", id);
        let request = self
            .client
            .delete(&self.table_url)
            .query(&[("select", COLUMNS), ("id", filter.as_str())])
            .header("Prefer", "return=representation");

        let deleted = !self.fetch_rows(request).await?.is_empty();
        info!("Delete entry {}: removed={}", id, deleted);
        Ok(deleted)
    }
}
