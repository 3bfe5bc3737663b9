//! File-backed record store
//!
//! Directory layout:
//! ```text
//! <base_dir>/
//! ├── letters/
//! │   ├── <id>.json
//! │   └── ...
//! ├── tasks/
//! └── ...
//! ```
//!
//! Writes go to a temporary sibling first and are renamed into place, so a
//! reader never sees a half-written record.

use super::{DurableStore, Filter};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One JSON file per record
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `base_dir`, creating it if needed
    pub async fn new(base_dir: PathBuf) -> Result<Self> {
        tokio::fs::create_dir_all(&base_dir).await?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn collection_dir(&self, collection: &str) -> Result<PathBuf> {
        validate_segment("collection", collection)?;
        Ok(self.base_dir.join(collection))
    }

    fn record_path(&self, collection: &str, id: &str) -> Result<PathBuf> {
        validate_segment("id", id)?;
        Ok(self.collection_dir(collection)?.join(format!("{}.json", id)))
    }
}

/// Ids and collection names become path segments; keep them boring
fn validate_segment(kind: &str, value: &str) -> Result<()> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::Validation(format!("Invalid {}: {:?}", kind, value)))
    }
}

#[async_trait]
impl DurableStore for FileStore {
    async fn put(&self, collection: &str, id: &str, record: Value) -> Result<()> {
        let dir = self.collection_dir(collection)?;
        let path = self.record_path(collection, id)?;
        tokio::fs::create_dir_all(&dir).await?;

        let json = serde_json::to_string_pretty(&record)?;
        let tmp = dir.join(format!(".{}.json.tmp", id));
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let path = self.record_path(collection, id)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(data) => Ok(Some(serde_json::from_str(&data)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn query(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>> {
        let dir = self.collection_dir(collection)?;
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let data = match tokio::fs::read_to_string(&path).await {
                Ok(data) => data,
                // Deleted between listing and reading
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            match serde_json::from_str::<Value>(&data) {
                Ok(record) if filter.matches(&record) => records.push(record),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}", path.display(), e);
                }
            }
        }
        Ok(records)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        let path = self.record_path(collection, id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn name(&self) -> &str {
        "file"
    }
}
