//! Durable record storage
//!
//! Records are JSON values grouped into named collections. The vault talks
//! to storage only through [`Repository`], which adds typed (de)serialization
//! and bounded retry on top of a [`DurableStore`] backend.

mod file;
mod memory;
mod retry;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use retry::{with_retry, RetryPolicy};

use crate::config::{StorageBackend, StorageConfig};
use crate::error::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Equality filter over top-level record fields
#[derive(Debug, Clone, Default)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    /// Match every record
    pub fn all() -> Self {
        Self::default()
    }

    /// Require `field == value`
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn matches(&self, record: &Value) -> bool {
        self.conditions
            .iter()
            .all(|(field, value)| record.get(field) == Some(value))
    }
}

/// Storage backend for JSON records.
///
/// `put` is an upsert keyed by `(collection, id)`.
#[async_trait]
pub trait DurableStore: Send + Sync {
    async fn put(&self, collection: &str, id: &str, record: Value) -> Result<()>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>>;

    async fn query(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>>;

    /// Remove a record, returning whether it existed
    async fn delete(&self, collection: &str, id: &str) -> Result<bool>;

    /// Human-readable name for this backend (used in logs)
    fn name(&self) -> &str;
}

/// Build the backend selected in configuration
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn DurableStore>> {
    let store: Arc<dyn DurableStore> = match config.backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File => Arc::new(FileStore::new(config.base_dir.clone()).await?),
    };
    tracing::info!(backend = store.name(), "Opened record store");
    Ok(store)
}

/// Typed access to a [`DurableStore`] with retry
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn DurableStore>,
    retry: RetryPolicy,
}

impl Repository {
    pub fn new(store: Arc<dyn DurableStore>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    /// In-memory repository without retry delays
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), RetryPolicy::none())
    }

    pub fn backend(&self) -> &str {
        self.store.name()
    }

    pub async fn put<T: Serialize>(&self, collection: &str, id: &str, record: &T) -> Result<()> {
        let value = serde_json::to_value(record)?;
        with_retry(&self.retry, "put", || {
            self.store.put(collection, id, value.clone())
        })
        .await
    }

    pub async fn get<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<Option<T>> {
        let value = with_retry(&self.retry, "get", || self.store.get(collection, id)).await?;
        value
            .map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }

    /// Records matching `filter`; records that fail to parse are skipped
    pub async fn query<T: DeserializeOwned>(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<T>> {
        let values =
            with_retry(&self.retry, "query", || self.store.query(collection, filter)).await?;

        Ok(values
            .into_iter()
            .filter_map(|v| match serde_json::from_value(v) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(collection, "Skipping unreadable record: {}", e);
                    None
                }
            })
            .collect())
    }

    pub async fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        with_retry(&self.retry, "delete", || self.store.delete(collection, id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        owner: String,
    }

    #[test]
    fn test_in_memory_makes_a_single_attempt() {
        let repo = Repository::in_memory();
        assert_eq!(repo.retry, RetryPolicy::none());
        assert_eq!(repo.backend(), "memory");
    }

    #[test]
    fn test_filter_matches() {
        let record = json!({"id": "a", "owner": "u1", "n": 3});
        assert!(Filter::all().matches(&record));
        assert!(Filter::all().eq("owner", "u1").matches(&record));
        assert!(Filter::all().eq("owner", "u1").eq("n", 3).matches(&record));
        assert!(!Filter::all().eq("owner", "u2").matches(&record));
        assert!(!Filter::all().eq("missing", "x").matches(&record));
    }

    #[tokio::test]
    async fn test_repository_typed_roundtrip() {
        let repo = Repository::in_memory();
        let note = Note {
            id: "n1".into(),
            owner: "u1".into(),
        };
        repo.put("notes", "n1", &note).await.unwrap();

        let fetched: Option<Note> = repo.get("notes", "n1").await.unwrap();
        assert_eq!(fetched, Some(note));

        let missing: Option<Note> = repo.get("notes", "nope").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_repository_query_skips_malformed() {
        let store = Arc::new(MemoryStore::new());
        store
            .put("notes", "good", json!({"id": "good", "owner": "u1"}))
            .await
            .unwrap();
        store
            .put("notes", "bad", json!({"owner": "u1"}))
            .await
            .unwrap();

        let repo = Repository::new(store, RetryPolicy::default());
        let notes: Vec<Note> = repo
            .query("notes", &Filter::all().eq("owner", "u1"))
            .await
            .unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, "good");
    }

    #[tokio::test]
    async fn test_open_memory_store() {
        let config = StorageConfig {
            backend: StorageBackend::Memory,
            ..Default::default()
        };
        let store = open_store(&config).await.unwrap();
        assert_eq!(store.name(), "memory");
    }
}
