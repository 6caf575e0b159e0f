use async_trait::async_trait;
use semsort_common::{AppConfig, Result, SemsortError, StoreBackend};
use semsort_vector::{Entry, NewEntry};
use std::sync::Arc;
use std::time::Duration;

use crate::json_file::JsonFileStore;
use crate::supabase::SupabaseStore;

/// Persistence for entries
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// All entries, oldest first (ties by id)
    async fn list(&self) -> Result<Vec<Entry>>;

    /// Insert an entry; returns it with its assigned id and timestamp
    async fn insert(&self, entry: NewEntry) -> Result<Entry>;

    /// Entry by id
    async fn get(&self, id: i64) -> Result<Option<Entry>>;

    /// Delete by id; `true` when something was removed
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// Build the store selected by `config`
pub fn build_store(config: &AppConfig) -> Result<Arc<dyn EntryStore>> {
    let store: Arc<dyn EntryStore> = match config.store_backend {
        StoreBackend::Supabase => {
            let (url, key) = match (&config.supabase_url, &config.supabase_key) {
                (Some(url), Some(key)) => (url, key),
                _ => return Err(SemsortError::config("SUPABASE_URL and SUPABASE_KEY must be set")),
            };
            Arc::new(SupabaseStore::new(
                url,
                key,
                &config.supabase_table,
                Duration::from_secs(config.http_timeout_secs),
            )?)
        }
        StoreBackend::Json => Arc::new(JsonFileStore::open(&config.data_path)?),
    };

    Ok(store)
}
