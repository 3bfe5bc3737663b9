//! Letter lifecycle: create, edit, open, share, delete
//!
//! The manager classifies content at write time, seals the payload, and
//! asks the gatekeeper before revealing or changing anything. Every
//! operation takes the current instant explicitly; there is no background
//! unlock timer.

use super::media::{MediaPreviews, PreviewGuard};
use crate::crypto::{seal, unseal, Cipher};
use crate::emotion::{EmotionClassifier, EmotionSample, Mood};
use crate::error::{Error, Result};
use crate::store::{Filter, Repository};
use crate::vault::{
    Gatekeeper, Letter, LetterChanges, LetterDraft, LetterPayload, LetterSummary, OpenedLetter,
    OwnerId, Task, TaskRegistry,
};
use crate::wall::LetterWall;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

const LETTERS: &str = "letters";

/// Owns every state transition of a letter
#[derive(Clone)]
pub struct LetterManager {
    repo: Repository,
    cipher: Arc<dyn Cipher>,
    classifier: Arc<EmotionClassifier>,
    gatekeeper: Gatekeeper,
    tasks: TaskRegistry,
    wall: LetterWall,
    previews: MediaPreviews,
}

impl LetterManager {
    pub fn new(
        repo: Repository,
        cipher: Arc<dyn Cipher>,
        classifier: Arc<EmotionClassifier>,
        gatekeeper: Gatekeeper,
        wall: LetterWall,
    ) -> Self {
        Self {
            tasks: TaskRegistry::new(repo.clone()),
            repo,
            cipher,
            classifier,
            gatekeeper,
            wall,
            previews: MediaPreviews::new(),
        }
    }

    pub fn tasks(&self) -> &TaskRegistry {
        &self.tasks
    }

    pub fn gatekeeper(&self) -> &Gatekeeper {
        &self.gatekeeper
    }

    pub fn previews(&self) -> &MediaPreviews {
        &self.previews
    }

    /// Classify, seal and store a new letter.
    ///
    /// Re-submitting a draft that was already stored returns the existing id
    /// without writing again.
    pub async fn create(&self, owner: &OwnerId, draft: LetterDraft, now: DateTime<Utc>) -> Result<String> {
        let unlock_at = draft
            .unlock_at
            .ok_or_else(|| Error::Validation("Unlock date is required".to_string()))?;
        let title = required_text("Title", &draft.title)?;
        let content = required_text("Content", &draft.content)?;
        if let Some(media) = &draft.media {
            media.validate()?;
        }
        if let Some(task_id) = &draft.linked_task_id {
            self.require_task(task_id, owner).await?;
        }

        if let Some(existing) = self.repo.get::<Letter>(LETTERS, &draft.id).await? {
            if &existing.owner_id != owner {
                return Err(Error::NotOwner);
            }
            tracing::debug!(letter_id = %existing.id, "Letter already stored");
            return Ok(existing.id);
        }

        let payload = LetterPayload {
            emotion: self.classifier.classify(&content),
            title,
            content,
            unlock_at,
            media: draft.media,
            moods: draft.moods,
        };
        let letter = Letter {
            id: draft.id,
            owner_id: owner.clone(),
            ciphertext: seal(self.cipher.as_ref(), &payload)?,
            created_at: now,
            unlock_at,
            linked_task_id: draft.linked_task_id,
            response_to: None,
            reflection: None,
        };
        self.repo.put(LETTERS, &letter.id, &letter).await?;

        tracing::info!(
            letter_id = %letter.id,
            mood = %payload.emotion.mood,
            unlock_at = %letter.unlock_at,
            "Letter sealed"
        );
        Ok(letter.id)
    }

    /// Change a letter during its grace window. Content is re-classified.
    pub async fn edit(
        &self,
        id: &str,
        caller: &OwnerId,
        now: DateTime<Utc>,
        changes: LetterChanges,
    ) -> Result<()> {
        let mut letter = self.load(id).await?;
        self.gatekeeper.check_edit(&letter, caller, now)?;
        if changes.is_empty() {
            return Ok(());
        }

        let mut payload: LetterPayload = unseal(self.cipher.as_ref(), &letter.ciphertext)?;
        if let Some(title) = &changes.title {
            payload.title = required_text("Title", title)?;
        }
        if let Some(content) = &changes.content {
            payload.content = required_text("Content", content)?;
        }
        if let Some(unlock_at) = changes.unlock_at {
            payload.unlock_at = unlock_at;
        }
        if let Some(media) = changes.media {
            media.validate()?;
            payload.media = Some(media);
        }
        if let Some(moods) = changes.moods {
            payload.moods = moods;
        }
        if let Some(task_id) = changes.linked_task_id {
            self.require_task(&task_id, caller).await?;
            letter.linked_task_id = Some(task_id);
        }
        payload.emotion = self.classifier.classify(&payload.content);

        letter.unlock_at = payload.unlock_at;
        letter.ciphertext = seal(self.cipher.as_ref(), &payload)?;
        self.repo.put(LETTERS, &letter.id, &letter).await?;

        tracing::info!(letter_id = %letter.id, mood = %payload.emotion.mood, "Letter edited");
        Ok(())
    }

    /// Decrypt a letter whose unlock conditions hold
    pub async fn open(&self, id: &str, caller: &OwnerId, now: DateTime<Utc>) -> Result<OpenedLetter> {
        let letter = self.load(id).await?;
        let task = self.linked_task(&letter).await?;
        self.gatekeeper
            .check_open(&letter, caller, now, task.as_ref())?;

        let payload: LetterPayload = unseal(self.cipher.as_ref(), &letter.ciphertext)?;
        let reflection = letter
            .reflection
            .as_deref()
            .map(|ct| unseal::<String>(self.cipher.as_ref(), ct))
            .transpose()?;

        tracing::info!(letter_id = %letter.id, "Letter opened");
        Ok(OpenedLetter {
            id: letter.id,
            owner_id: letter.owner_id,
            title: payload.title,
            content: payload.content,
            created_at: letter.created_at,
            unlock_at: letter.unlock_at,
            emotion: payload.emotion,
            media: payload.media,
            moods: payload.moods,
            response_to: letter.response_to,
            reflection,
            opened_at: now,
        })
    }

    /// Preview handle for an opened letter's media, held while it is shown
    pub fn preview(&self, opened: &OpenedLetter) -> Option<PreviewGuard> {
        opened.media.as_ref().map(|_| self.previews.acquire(&opened.id))
    }

    /// Publish an opened letter to the wall; returns the shared id
    pub async fn share(&self, opened: &OpenedLetter, tags: &[String], now: DateTime<Utc>) -> Result<String> {
        let shared = self
            .wall
            .publish(&opened.content, opened.emotion.mood, tags, now)
            .await?;
        Ok(shared.id)
    }

    /// Remove a letter in any state. Media previews are released even if
    /// the store call fails.
    pub async fn delete(&self, id: &str, caller: &OwnerId) -> Result<()> {
        let letter = self.load(id).await?;
        if &letter.owner_id != caller {
            return Err(Error::NotOwner);
        }

        let _previews = self.previews.release_on_drop(id);
        if !self.repo.delete(LETTERS, id).await? {
            return Err(Error::NotFound(format!("letter {}", id)));
        }
        tracing::info!(letter_id = %id, "Letter deleted");
        Ok(())
    }

    /// Write a reply to an opened letter. The reply is readable immediately.
    pub async fn respond(&self, opened: &OpenedLetter, content: &str, now: DateTime<Utc>) -> Result<String> {
        let content = required_text("Content", content)?;
        let payload = LetterPayload {
            title: format!("Re: {}", opened.title),
            emotion: self.classifier.classify(&content),
            content,
            unlock_at: now,
            media: None,
            moods: Vec::new(),
        };
        let letter = Letter {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: opened.owner_id.clone(),
            ciphertext: seal(self.cipher.as_ref(), &payload)?,
            created_at: now,
            unlock_at: now,
            linked_task_id: None,
            response_to: Some(opened.id.clone()),
            reflection: None,
        };
        self.repo.put(LETTERS, &letter.id, &letter).await?;

        tracing::info!(letter_id = %letter.id, response_to = %opened.id, "Response sealed");
        Ok(letter.id)
    }

    /// Attach (or replace) a reflection on an unlocked letter
    pub async fn reflect(&self, id: &str, caller: &OwnerId, now: DateTime<Utc>, text: &str) -> Result<()> {
        let mut letter = self.load(id).await?;
        let task = self.linked_task(&letter).await?;
        self.gatekeeper
            .check_open(&letter, caller, now, task.as_ref())?;

        let text = required_text("Reflection", text)?;
        letter.reflection = Some(seal(self.cipher.as_ref(), &text)?);
        self.repo.put(LETTERS, &letter.id, &letter).await?;

        tracing::info!(letter_id = %letter.id, "Reflection added");
        Ok(())
    }

    /// Mood of the owner's letter written just before this one.
    ///
    /// The letter itself must be openable. A previous letter that is still
    /// locked or cannot be decrypted counts as absent.
    pub async fn previous_mood(&self, id: &str, caller: &OwnerId, now: DateTime<Utc>) -> Result<Option<Mood>> {
        let letter = self.load(id).await?;
        let task = self.linked_task(&letter).await?;
        self.gatekeeper
            .check_open(&letter, caller, now, task.as_ref())?;

        let previous = self
            .owned(caller)
            .await?
            .into_iter()
            .filter(|l| l.created_at < letter.created_at)
            .max_by_key(|l| l.created_at);
        let Some(previous) = previous else {
            return Ok(None);
        };
        let previous_task = self.linked_task(&previous).await?;
        if !self
            .gatekeeper
            .is_unlocked(&previous, now, previous_task.as_ref())
        {
            return Ok(None);
        }

        match unseal::<LetterPayload>(self.cipher.as_ref(), &previous.ciphertext) {
            Ok(payload) => Ok(Some(payload.emotion.mood)),
            Err(Error::DecryptionFailure) => {
                tracing::warn!(letter_id = %previous.id, "Previous letter unreadable, skipping mood");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Owner's letters, newest first, without decrypting anything
    pub async fn list(&self, owner: &OwnerId, now: DateTime<Utc>) -> Result<Vec<LetterSummary>> {
        let mut letters = self.owned(owner).await?;
        letters.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut tasks: HashMap<String, Option<Task>> = HashMap::new();
        let mut summaries = Vec::with_capacity(letters.len());
        for letter in letters {
            let task = match &letter.linked_task_id {
                Some(task_id) => {
                    if !tasks.contains_key(task_id) {
                        let task = self.tasks.get(task_id).await?;
                        tasks.insert(task_id.clone(), task);
                    }
                    tasks.get(task_id).cloned().flatten()
                }
                None => None,
            };

            summaries.push(LetterSummary {
                lock_state: self.gatekeeper.lock_state(&letter, now, task.as_ref()),
                editable: self.gatekeeper.is_editable(&letter, now),
                has_reflection: letter.reflection.is_some(),
                id: letter.id,
                created_at: letter.created_at,
                unlock_at: letter.unlock_at,
                linked_task_id: letter.linked_task_id,
                response_to: letter.response_to,
            });
        }
        Ok(summaries)
    }

    /// Sentiment samples from the owner's unlocked letters.
    ///
    /// Fails with [`Error::DecryptionFailure`] if any unlocked letter
    /// cannot be decrypted.
    pub async fn emotion_samples(&self, owner: &OwnerId, now: DateTime<Utc>) -> Result<Vec<EmotionSample>> {
        let mut samples = Vec::new();
        for letter in self.owned(owner).await? {
            let task = self.linked_task(&letter).await?;
            if !self.gatekeeper.is_unlocked(&letter, now, task.as_ref()) {
                continue;
            }
            let payload: LetterPayload = unseal(self.cipher.as_ref(), &letter.ciphertext)?;
            samples.push(EmotionSample::from_analysis(
                letter.created_at,
                &self.classifier.sentiment(&payload.content),
            ));
        }
        Ok(samples)
    }

    /// Number of letters the owner has written
    pub async fn count(&self, owner: &OwnerId) -> Result<usize> {
        Ok(self.owned(owner).await?.len())
    }

    async fn load(&self, id: &str) -> Result<Letter> {
        self.repo
            .get(LETTERS, id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("letter {}", id)))
    }

    async fn owned(&self, owner: &OwnerId) -> Result<Vec<Letter>> {
        self.repo
            .query(LETTERS, &Filter::all().eq("owner_id", owner.as_str()))
            .await
    }

    async fn linked_task(&self, letter: &Letter) -> Result<Option<Task>> {
        match &letter.linked_task_id {
            Some(task_id) => self.tasks.get(task_id).await,
            None => Ok(None),
        }
    }

    async fn require_task(&self, task_id: &str, owner: &OwnerId) -> Result<Task> {
        self.tasks
            .get_owned(task_id, owner)
            .await
            .map_err(|e| match e {
                Error::NotFound(_) => Error::Validation(format!("Unknown task: {}", task_id)),
                other => other,
            })
    }
}

fn required_text(field: &str, value: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierConfig;
    use crate::crypto::{AesGcmCipher, VaultKey};
    use crate::lifecycle::clock::{Clock, ManualClock};
    use crate::lifecycle::media::{MediaAttachment, MediaKind};
    use crate::store::{DurableStore, MemoryStore, RetryPolicy};
    use crate::vault::LockState;
    use crate::wall::{WallFilter, MAX_TAGS};
    use chrono::{Duration, TimeZone};

    struct Fixture {
        manager: LetterManager,
        wall: LetterWall,
        store: Arc<MemoryStore>,
        clock: ManualClock,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let repo = Repository::new(store.clone(), RetryPolicy::none());
        let wall = LetterWall::new(repo.clone(), MAX_TAGS);
        let manager = LetterManager::new(
            repo,
            Arc::new(AesGcmCipher::new(VaultKey::generate())),
            Arc::new(EmotionClassifier::new(&ClassifierConfig::default()).unwrap()),
            Gatekeeper::default(),
            wall.clone(),
        );
        Fixture {
            manager,
            wall,
            store,
            clock: ManualClock::new(Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()),
        }
    }

    fn alice() -> OwnerId {
        OwnerId::new("alice")
    }

    fn draft(unlock_at: DateTime<Utc>) -> LetterDraft {
        LetterDraft::new("Dear me", "I am so grateful and thankful for this year").unlock_at(unlock_at)
    }

    #[tokio::test]
    async fn test_locked_until_date_then_opens_with_original_emotion() {
        let f = fixture();
        let id = f
            .manager
            .create(&alice(), draft(f.clock.now() + Duration::days(1)), f.clock.now())
            .await
            .unwrap();

        let err = f.manager.open(&id, &alice(), f.clock.now()).await.unwrap_err();
        assert!(matches!(err, Error::StillLocked(LockState::LockedDate)));

        f.clock.advance(Duration::days(1) + Duration::seconds(1));
        let opened = f.manager.open(&id, &alice(), f.clock.now()).await.unwrap();
        assert_eq!(opened.title, "Dear me");
        assert_eq!(opened.emotion.mood, Mood::Gratitude);
        assert!(opened.emotion.confidence > 0);
    }

    #[tokio::test]
    async fn test_create_requires_fields() {
        let f = fixture();
        let now = f.clock.now();

        let no_date = LetterDraft::new("t", "c");
        let err = f.manager.create(&alice(), no_date, now).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let blank = LetterDraft::new(" ", "c").unlock_at(now);
        let err = f.manager.create(&alice(), blank, now).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let unknown_task = draft(now).linked_task("missing");
        let err = f.manager.create(&alice(), unknown_task, now).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_is_idempotent() {
        let f = fixture();
        let now = f.clock.now();
        let d = draft(now + Duration::days(1));

        let first = f.manager.create(&alice(), d.clone(), now).await.unwrap();
        let second = f
            .manager
            .create(&alice(), d.clone(), now + Duration::minutes(1))
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(f.store.len(LETTERS).await, 1);

        let err = f
            .manager
            .create(&OwnerId::new("mallory"), d, now)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotOwner));
    }

    #[tokio::test]
    async fn test_ciphertext_hides_content() {
        let f = fixture();
        let now = f.clock.now();
        let id = f.manager.create(&alice(), draft(now), now).await.unwrap();

        let raw = f.store.get(LETTERS, &id).await.unwrap().unwrap();
        let text = raw.to_string();
        assert!(!text.contains("grateful"));
        assert!(!text.contains("Dear me"));
        assert!(raw.get("emotion").is_none());
    }

    #[tokio::test]
    async fn test_task_gate() {
        let f = fixture();
        let now = f.clock.now();
        let task = f.manager.tasks().add(&alice(), "Run a marathon", now).await.unwrap();
        let id = f
            .manager
            .create(&alice(), draft(now).linked_task(task.id.clone()), now)
            .await
            .unwrap();

        let later = now + Duration::days(30);
        let err = f.manager.open(&id, &alice(), later).await.unwrap_err();
        assert!(matches!(err, Error::StillLocked(LockState::LockedTask)));

        f.manager.tasks().complete(&task.id, &alice(), later).await.unwrap();
        assert!(f.manager.open(&id, &alice(), later).await.is_ok());
    }

    #[tokio::test]
    async fn test_open_errors() {
        let f = fixture();
        let now = f.clock.now();
        let id = f.manager.create(&alice(), draft(now), now).await.unwrap();

        let err = f.manager.open("missing", &alice(), now).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        let err = f
            .manager
            .open(&id, &OwnerId::new("bob"), now)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotOwner));
    }

    #[tokio::test]
    async fn test_open_with_wrong_key_is_decryption_failure() {
        let f = fixture();
        let now = f.clock.now();
        let id = f.manager.create(&alice(), draft(now), now).await.unwrap();

        let other = LetterManager::new(
            Repository::new(f.store.clone(), RetryPolicy::none()),
            Arc::new(AesGcmCipher::new(VaultKey::generate())),
            Arc::new(EmotionClassifier::new(&ClassifierConfig::default()).unwrap()),
            Gatekeeper::default(),
            f.wall.clone(),
        );
        let err = other.open(&id, &alice(), now).await.unwrap_err();
        assert!(matches!(err, Error::DecryptionFailure));
    }

    #[tokio::test]
    async fn test_edit_within_grace_reclassifies() {
        let f = fixture();
        let now = f.clock.now();
        let id = f.manager.create(&alice(), draft(now), now).await.unwrap();

        let changes = LetterChanges {
            content: Some("I feel miserable and heartbroken".into()),
            ..Default::default()
        };
        f.manager
            .edit(&id, &alice(), now + Duration::minutes(29), changes)
            .await
            .unwrap();

        let opened = f
            .manager
            .open(&id, &alice(), now + Duration::minutes(30))
            .await
            .unwrap();
        assert_eq!(opened.emotion.mood, Mood::Sadness);
        assert_eq!(opened.created_at, now);
        assert_eq!(opened.id, id);
    }

    #[tokio::test]
    async fn test_edit_after_grace_rejected() {
        let f = fixture();
        let now = f.clock.now();
        let id = f
            .manager
            .create(&alice(), draft(now + Duration::days(365)), now)
            .await
            .unwrap();

        let changes = LetterChanges {
            unlock_at: Some(now),
            ..Default::default()
        };
        let err = f
            .manager
            .edit(&id, &alice(), now + Duration::minutes(30), changes.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EditWindowExpired));

        let err = f
            .manager
            .edit(&id, &OwnerId::new("bob"), now, changes)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotOwner));
    }

    #[tokio::test]
    async fn test_edit_moves_unlock_date() {
        let f = fixture();
        let now = f.clock.now();
        let id = f
            .manager
            .create(&alice(), draft(now + Duration::days(365)), now)
            .await
            .unwrap();

        let changes = LetterChanges {
            unlock_at: Some(now + Duration::hours(1)),
            ..Default::default()
        };
        f.manager.edit(&id, &alice(), now, changes).await.unwrap();

        assert!(f
            .manager
            .open(&id, &alice(), now + Duration::hours(1))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_share_publishes_redacted_copy() {
        let f = fixture();
        let now = f.clock.now();
        let id = f.manager.create(&alice(), draft(now), now).await.unwrap();
        let opened = f.manager.open(&id, &alice(), now).await.unwrap();

        let too_many: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let err = f.manager.share(&opened, &too_many, now).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let shared_id = f
            .manager
            .share(&opened, &["growth".to_string()], now)
            .await
            .unwrap();
        assert_ne!(shared_id, id);

        let listed = f.wall.list(&WallFilter::default()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].letter.content, opened.content);
        assert_eq!(listed[0].letter.mood, opened.emotion.mood);
    }

    #[tokio::test]
    async fn test_delete_releases_previews() {
        let f = fixture();
        let now = f.clock.now();
        let media = MediaAttachment::new(MediaKind::Image, "https://example.com/p.png").unwrap();
        let id = f
            .manager
            .create(&alice(), draft(now).media(media), now)
            .await
            .unwrap();
        let opened = f.manager.open(&id, &alice(), now).await.unwrap();
        let _preview = f.manager.preview(&opened);
        assert_eq!(f.manager.previews().active(&id), 1);

        let err = f.manager.delete(&id, &OwnerId::new("bob")).await.unwrap_err();
        assert!(matches!(err, Error::NotOwner));
        assert_eq!(f.manager.previews().active(&id), 1);

        f.manager.delete(&id, &alice()).await.unwrap();
        assert_eq!(f.manager.previews().active(&id), 0);

        let err = f.manager.open(&id, &alice(), now).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_preview_released_when_dropped() {
        let f = fixture();
        let now = f.clock.now();
        let media = MediaAttachment::new(MediaKind::Image, "https://example.com/p.png").unwrap();
        let id = f
            .manager
            .create(&alice(), draft(now).media(media), now)
            .await
            .unwrap();

        for _ in 0..5 {
            let opened = f.manager.open(&id, &alice(), now).await.unwrap();
            let preview = f.manager.preview(&opened);
            assert!(preview.is_some());
            assert_eq!(f.manager.previews().active(&id), 1);
        }
        assert_eq!(f.manager.previews().active(&id), 0);

        let plain = f.manager.create(&alice(), draft(now), now).await.unwrap();
        let opened = f.manager.open(&plain, &alice(), now).await.unwrap();
        assert!(f.manager.preview(&opened).is_none());
        assert_eq!(f.manager.previews().active(&plain), 0);
    }

    #[tokio::test]
    async fn test_delete_locked_letter() {
        let f = fixture();
        let now = f.clock.now();
        let id = f
            .manager
            .create(&alice(), draft(now + Duration::days(400)), now)
            .await
            .unwrap();
        f.manager.delete(&id, &alice()).await.unwrap();
        assert!(matches!(
            f.manager.delete(&id, &alice()).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_respond_and_reflect() {
        let f = fixture();
        let now = f.clock.now();
        let id = f.manager.create(&alice(), draft(now), now).await.unwrap();
        let opened = f.manager.open(&id, &alice(), now).await.unwrap();

        let reply_id = f
            .manager
            .respond(&opened, "Thank you, past me.", now)
            .await
            .unwrap();
        let reply = f.manager.open(&reply_id, &alice(), now).await.unwrap();
        assert_eq!(reply.response_to.as_deref(), Some(id.as_str()));
        assert_eq!(reply.title, "Re: Dear me");

        f.manager
            .reflect(&id, &alice(), now, "I kept my promise.")
            .await
            .unwrap();
        let reopened = f.manager.open(&id, &alice(), now).await.unwrap();
        assert_eq!(reopened.reflection.as_deref(), Some("I kept my promise."));
    }

    #[tokio::test]
    async fn test_reflect_requires_unlocked() {
        let f = fixture();
        let now = f.clock.now();
        let id = f
            .manager
            .create(&alice(), draft(now + Duration::days(1)), now)
            .await
            .unwrap();
        let err = f
            .manager
            .reflect(&id, &alice(), now, "too early")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::StillLocked(_)));
    }

    #[tokio::test]
    async fn test_previous_mood() {
        let f = fixture();
        let now = f.clock.now();
        let first = f
            .manager
            .create(
                &alice(),
                LetterDraft::new("one", "I am furious and angry").unlock_at(now),
                now,
            )
            .await
            .unwrap();
        let second = f
            .manager
            .create(&alice(), draft(now), now + Duration::hours(1))
            .await
            .unwrap();

        let later = now + Duration::hours(1);
        assert_eq!(f.manager.previous_mood(&first, &alice(), later).await.unwrap(), None);
        assert_eq!(
            f.manager.previous_mood(&second, &alice(), later).await.unwrap(),
            Some(Mood::Anger)
        );
        let err = f
            .manager
            .previous_mood(&second, &OwnerId::new("bob"), later)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotOwner));
    }

    #[tokio::test]
    async fn test_previous_mood_respects_locks() {
        let f = fixture();
        let now = f.clock.now();
        let year = now + Duration::days(365);
        let first = f
            .manager
            .create(
                &alice(),
                LetterDraft::new("one", "I am furious and angry").unlock_at(year),
                now,
            )
            .await
            .unwrap();
        let second = f
            .manager
            .create(&alice(), draft(year), now + Duration::hours(1))
            .await
            .unwrap();

        let err = f
            .manager
            .previous_mood(&second, &alice(), now + Duration::hours(2))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::StillLocked(LockState::LockedDate)));

        let third = f
            .manager
            .create(&alice(), draft(now), now + Duration::hours(2))
            .await
            .unwrap();
        assert_eq!(
            f.manager
                .previous_mood(&third, &alice(), now + Duration::hours(3))
                .await
                .unwrap(),
            None
        );

        assert_eq!(
            f.manager.previous_mood(&second, &alice(), year).await.unwrap(),
            Some(Mood::Anger)
        );
        assert!(f.manager.open(&first, &alice(), year).await.is_ok());
    }

    #[tokio::test]
    async fn test_previous_mood_tolerates_corruption() {
        let f = fixture();
        let now = f.clock.now();
        let first = f.manager.create(&alice(), draft(now), now).await.unwrap();
        let second = f
            .manager
            .create(&alice(), draft(now), now + Duration::hours(1))
            .await
            .unwrap();

        let mut record = f.store.get(LETTERS, &first).await.unwrap().unwrap();
        record["ciphertext"] = serde_json::json!("garbage");
        f.store.put(LETTERS, &first, record).await.unwrap();

        let later = now + Duration::hours(1);
        assert_eq!(f.manager.previous_mood(&second, &alice(), later).await.unwrap(), None);
        assert!(matches!(
            f.manager.open(&first, &alice(), now).await,
            Err(Error::DecryptionFailure)
        ));
    }

    #[tokio::test]
    async fn test_emotion_samples_surface_corruption() {
        let f = fixture();
        let now = f.clock.now();
        let id = f.manager.create(&alice(), draft(now), now).await.unwrap();
        f.manager.create(&alice(), draft(now), now).await.unwrap();

        let mut record = f.store.get(LETTERS, &id).await.unwrap().unwrap();
        record["ciphertext"] = serde_json::json!("garbage");
        f.store.put(LETTERS, &id, record).await.unwrap();

        assert!(matches!(
            f.manager.emotion_samples(&alice(), now).await,
            Err(Error::DecryptionFailure)
        ));
    }

    #[tokio::test]
    async fn test_list_summaries() {
        let f = fixture();
        let now = f.clock.now();
        let locked = f
            .manager
            .create(&alice(), draft(now + Duration::days(2)), now)
            .await
            .unwrap();
        let open = f
            .manager
            .create(&alice(), draft(now), now + Duration::hours(1))
            .await
            .unwrap();
        f.manager
            .create(&OwnerId::new("bob"), draft(now), now)
            .await
            .unwrap();

        let list = f
            .manager
            .list(&alice(), now + Duration::hours(2))
            .await
            .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, open);
        assert_eq!(list[0].lock_state, LockState::Unlocked);
        assert_eq!(list[1].id, locked);
        assert_eq!(list[1].lock_state, LockState::LockedDate);
        assert!(!list[1].editable);
    }

    #[tokio::test]
    async fn test_emotion_samples_skip_locked() {
        let f = fixture();
        let now = f.clock.now();
        f.manager.create(&alice(), draft(now), now).await.unwrap();
        f.manager
            .create(&alice(), draft(now + Duration::days(9)), now)
            .await
            .unwrap();

        let samples = f.manager.emotion_samples(&alice(), now).await.unwrap();
        assert_eq!(samples.len(), 1);
        assert!(samples[0].sentiment_score > 0);
        assert_eq!(f.manager.count(&alice()).await.unwrap(), 2);
    }
}
