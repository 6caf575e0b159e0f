use async_trait::async_trait;
use chrono::Utc;
use semsort_common::{Result, SemsortError};
use semsort_vector::{Entry, NewEntry};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::info;

use crate::store::EntryStore;

/// Entries kept in memory and mirrored to one pretty-printed JSON file
pub struct JsonFileStore {
    entries: RwLock<Vec<Entry>>,
    file_path: PathBuf,
}

impl JsonFileStore {
    /// Open the store at `path`; a missing file is an empty store
    pub fn open(path: &Path) -> Result<Self> {
        let mut entries: Vec<Entry> = if path.exists() {
            let data = std::fs::read_to_string(path)?;
            serde_json::from_str(&data).map_err(|e| {
                SemsortError::store(format!("Corrupt entry file {}: {}", path.display(), e))
            })?
        } else {
            Vec::new()
        };
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        info!("JSON store opened: {} ({} entries)", path.display(), entries.len());
        Ok(Self {
            entries: RwLock::new(entries),
            file_path: path.to_path_buf(),
        })
    }

    async fn save(&self, entries: &[Entry]) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let data = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.file_path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, data).await?;
        tokio::fs::rename(&tmp_path, &self.file_path).await?;
        Ok(())
    }
}

#[async_trait]
impl EntryStore for JsonFileStore {
    async fn list(&self) -> Result<Vec<Entry>> {
        Ok(self.entries.read().await.clone())
    }

    async fn insert(&self, entry: NewEntry) -> Result<Entry> {
        let mut entries = self.entries.write().await;

        let id = entries.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        let created_at = entries
            .last()
            .map(|last| last.created_at.max(Utc::now()))
            .unwrap_or_else(Utc::now);
        let entry = Entry {
            id,
            text: entry.text,
            embedding: entry.embedding,
            created_at,
        };

        entries.push(entry.clone());
        if let Err(e) = self.save(&entries).await {
            entries.pop();
            return Err(e);
        }

        info!("Inserted entry {} ({} chars)", entry.id, entry.text.len());
        Ok(entry)
    }

    async fn get(&self, id: i64) -> Result<Option<Entry>> {
        Ok(self.entries.read().await.iter().find(|e| e.id == id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut entries = self.entries.write().await;
        let Some(pos) = entries.iter().position(|e| e.id == id) else {
            return Ok(false);
        };

        let removed = entries.remove(pos);
        if let Err(e) = self.save(&entries).await {
            entries.insert(pos, removed);
            return Err(e);
        }

        info!("Deleted entry {}", id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(&dir.path().join("entries.json")).unwrap();

        let a = store.insert(NewEntry::new("a", vec![1.0, 0.0])).await.unwrap();
        let b = store.insert(NewEntry::new("b", vec![0.0, 1.0])).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert!(a.created_at <= b.created_at);

        let texts: Vec<String> = store.list().await.unwrap().into_iter().map(|e| e.text).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("entries.json");

        {
            let store = JsonFileStore::open(&path).unwrap();
            store.insert(NewEntry::new("kept", vec![0.5])).await.unwrap();
            store.insert(NewEntry::new("dropped", vec![0.25])).await.unwrap();
            assert!(store.delete(2).await.unwrap());
        }

        let reopened = JsonFileStore::open(&path).unwrap();
        let entries = reopened.list().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "kept");
        assert_eq!(entries[0].embedding, vec![0.5]);

        // max(id) + 1: the deleted highest id comes back
        let next = reopened.insert(NewEntry::new("next", vec![1.0])).await.unwrap();
        assert_eq!(next.id, 2);
    }

    #[tokio::test]
    async fn test_get_and_delete_missing() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(&dir.path().join("entries.json")).unwrap();
        store.insert(NewEntry::new("only", vec![1.0])).await.unwrap();

        assert_eq!(store.get(1).await.unwrap().unwrap().text, "only");
        assert!(store.get(99).await.unwrap().is_none());
        assert!(!store.delete(99).await.unwrap());
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("entries.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::open(&path).err().unwrap();
        assert!(matches!(err, SemsortError::Store(_)));
    }
}
