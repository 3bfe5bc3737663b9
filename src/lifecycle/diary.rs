//! Diary entries
//!
//! Diary entries are sealed like letters but have no unlock conditions:
//! the owner can always read them back.

use crate::crypto::{seal, unseal, Cipher};
use crate::emotion::{EmotionClassifier, EmotionResult, EmotionSample, Mood};
use crate::error::{Error, Result};
use crate::store::{Filter, Repository};
use crate::vault::OwnerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const DIARY: &str = "diary";

/// Stored diary entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub id: String,
    pub owner_id: OwnerId,
    pub ciphertext: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct DiaryPayload {
    content: String,
    emotion: EmotionResult,
    #[serde(default)]
    self_reported: Option<Mood>,
}

/// Decrypted diary entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryView {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub content: String,
    pub emotion: EmotionResult,
    /// Mood the writer picked, if any
    pub self_reported: Option<Mood>,
}

#[derive(Clone)]
pub struct DiaryManager {
    repo: Repository,
    cipher: Arc<dyn Cipher>,
    classifier: Arc<EmotionClassifier>,
}

impl DiaryManager {
    pub fn new(repo: Repository, cipher: Arc<dyn Cipher>, classifier: Arc<EmotionClassifier>) -> Self {
        Self {
            repo,
            cipher,
            classifier,
        }
    }

    pub async fn write(
        &self,
        owner: &OwnerId,
        content: &str,
        self_reported: Option<Mood>,
        now: DateTime<Utc>,
    ) -> Result<DiaryView> {
        if content.trim().is_empty() {
            return Err(Error::Validation("Diary entry is empty".to_string()));
        }

        let payload = DiaryPayload {
            content: content.to_string(),
            emotion: self.classifier.classify(content),
            self_reported,
        };
        let entry = DiaryEntry {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner.clone(),
            ciphertext: seal(self.cipher.as_ref(), &payload)?,
            created_at: now,
        };
        self.repo.put(DIARY, &entry.id, &entry).await?;

        tracing::info!(entry_id = %entry.id, mood = %payload.emotion.mood, "Diary entry written");
        Ok(view(entry, payload))
    }

    /// Owner's entries, newest first. An entry that cannot be decrypted
    /// fails the whole listing with [`Error::DecryptionFailure`].
    pub async fn list(&self, owner: &OwnerId) -> Result<Vec<DiaryView>> {
        let mut views = self
            .owned(owner)
            .await?
            .into_iter()
            .map(|entry| self.decrypt(entry))
            .collect::<Result<Vec<_>>>()?;
        views.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(views)
    }

    pub async fn delete(&self, owner: &OwnerId, id: &str) -> Result<()> {
        let entry: DiaryEntry = self
            .repo
            .get(DIARY, id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("diary entry {}", id)))?;
        if &entry.owner_id != owner {
            return Err(Error::NotOwner);
        }
        self.repo.delete(DIARY, id).await?;
        tracing::info!(entry_id = %id, "Diary entry deleted");
        Ok(())
    }

    /// Sentiment samples for insights
    pub async fn emotion_samples(&self, owner: &OwnerId) -> Result<Vec<EmotionSample>> {
        Ok(self
            .list(owner)
            .await?
            .into_iter()
            .map(|v| EmotionSample::from_analysis(v.created_at, &self.classifier.sentiment(&v.content)))
            .collect())
    }

    async fn owned(&self, owner: &OwnerId) -> Result<Vec<DiaryEntry>> {
        self.repo
            .query(DIARY, &Filter::all().eq("owner_id", owner.as_str()))
            .await
    }

    fn decrypt(&self, entry: DiaryEntry) -> Result<DiaryView> {
        let payload: DiaryPayload = unseal(self.cipher.as_ref(), &entry.ciphertext).map_err(|e| {
            tracing::warn!(entry_id = %entry.id, "Unreadable diary entry: {}", e);
            e
        })?;
        Ok(view(entry, payload))
    }
}

fn view(entry: DiaryEntry, payload: DiaryPayload) -> DiaryView {
    DiaryView {
        id: entry.id,
        created_at: entry.created_at,
        content: payload.content,
        emotion: payload.emotion,
        self_reported: payload.self_reported,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierConfig;
    use crate::crypto::{AesGcmCipher, VaultKey};
    use crate::store::{DurableStore, MemoryStore, RetryPolicy};
    use chrono::Duration;

    fn manager() -> DiaryManager {
        manager_on(Arc::new(MemoryStore::new()))
    }

    fn manager_on(store: Arc<MemoryStore>) -> DiaryManager {
        DiaryManager::new(
            Repository::new(store, RetryPolicy::none()),
            Arc::new(AesGcmCipher::new(VaultKey::generate())),
            Arc::new(EmotionClassifier::new(&ClassifierConfig::default()).unwrap()),
        )
    }

    #[tokio::test]
    async fn test_write_and_list_newest_first() {
        let diary = manager();
        let owner = OwnerId::new("u1");
        let now = Utc::now();

        diary.write(&owner, "Calm and peaceful morning", None, now).await.unwrap();
        diary
            .write(&owner, "Worried about the exam", Some(Mood::Fear), now + Duration::hours(3))
            .await
            .unwrap();
        diary
            .write(&OwnerId::new("u2"), "not mine", None, now)
            .await
            .unwrap();

        let entries = diary.list(&owner).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].emotion.mood, Mood::Fear);
        assert_eq!(entries[0].self_reported, Some(Mood::Fear));
        assert_eq!(entries[1].emotion.mood, Mood::Calm);
    }

    #[tokio::test]
    async fn test_write_rejects_empty() {
        let diary = manager();
        let err = diary
            .write(&OwnerId::new("u1"), "  ", None, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_checks_owner() {
        let diary = manager();
        let owner = OwnerId::new("u1");
        let entry = diary.write(&owner, "hello", None, Utc::now()).await.unwrap();

        let err = diary.delete(&OwnerId::new("u2"), &entry.id).await.unwrap_err();
        assert!(matches!(err, Error::NotOwner));

        diary.delete(&owner, &entry.id).await.unwrap();
        assert!(diary.list(&owner).await.unwrap().is_empty());
        assert!(matches!(
            diary.delete(&owner, &entry.id).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_emotion_samples() {
        let diary = manager();
        let owner = OwnerId::new("u1");
        diary
            .write(&owner, "happy and grateful", None, Utc::now())
            .await
            .unwrap();

        let samples = diary.emotion_samples(&owner).await.unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].sentiment_score, 6);
        assert_eq!(samples[0].themes, vec!["happy", "grateful"]);
    }

    #[tokio::test]
    async fn test_unreadable_entry_fails_listing() {
        let store = Arc::new(MemoryStore::new());
        let diary = manager_on(store.clone());
        let owner = OwnerId::new("u1");
        diary.write(&owner, "fine day", None, Utc::now()).await.unwrap();
        let entry = diary.write(&owner, "rainy day", None, Utc::now()).await.unwrap();

        let mut record = store.get(DIARY, &entry.id).await.unwrap().unwrap();
        record["ciphertext"] = serde_json::json!("garbage");
        store.put(DIARY, &entry.id, record).await.unwrap();

        assert!(matches!(diary.list(&owner).await, Err(Error::DecryptionFailure)));
        assert!(matches!(
            diary.emotion_samples(&owner).await,
            Err(Error::DecryptionFailure)
        ));
    }
}
