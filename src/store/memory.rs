//! In-memory record store
//!
//! Uses `tokio::sync::RwLock` for concurrent access. Nothing survives a
//! restart; intended for tests and ephemeral servers.

use super::{DurableStore, Filter};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

type Collection = HashMap<String, Value>;

/// In-memory store keyed by collection, then record id
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of records in a collection
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, HashMap::len)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    async fn put(&self, collection: &str, id: &str, record: Value) -> Result<()> {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), record);
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .and_then(|c| c.get(id))
            .cloned())
    }

    async fn query(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .map(|c| c.values().filter(|v| filter.matches(v)).cloned().collect())
            .unwrap_or_default())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        Ok(self
            .collections
            .write()
            .await
            .get_mut(collection)
            .and_then(|c| c.remove(id))
            .is_some())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
