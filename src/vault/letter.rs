//! Letter records and their decrypted views

use crate::emotion::{EmotionResult, Mood};
use crate::lifecycle::media::MediaAttachment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::LockState;

/// Opaque identity of a record owner
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored letter. Everything the writer wrote is inside `ciphertext`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Letter {
    pub id: String,
    pub owner_id: OwnerId,
    /// Encrypted [`LetterPayload`]
    pub ciphertext: String,
    pub created_at: DateTime<Utc>,
    pub unlock_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_task_id: Option<String>,
    /// Letter this one answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_to: Option<String>,
    /// Encrypted reflection written after opening
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection: Option<String>,
}

/// Plaintext sealed inside a letter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterPayload {
    pub title: String,
    pub content: String,
    pub unlock_at: DateTime<Utc>,
    /// Computed once at write time, never on read
    pub emotion: EmotionResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaAttachment>,
    /// Moods the writer tagged themselves
    #[serde(default)]
    pub moods: Vec<Mood>,
}

fn new_letter_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A letter about to be sealed.
///
/// The id is fixed when the draft is built, so submitting the same draft
/// twice writes the same record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterDraft {
    #[serde(default = "new_letter_id")]
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub unlock_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub linked_task_id: Option<String>,
    #[serde(default)]
    pub media: Option<MediaAttachment>,
    #[serde(default)]
    pub moods: Vec<Mood>,
}

impl LetterDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: new_letter_id(),
            title: title.into(),
            content: content.into(),
            unlock_at: None,
            linked_task_id: None,
            media: None,
            moods: Vec::new(),
        }
    }

    pub fn unlock_at(mut self, at: DateTime<Utc>) -> Self {
        self.unlock_at = Some(at);
        self
    }

    pub fn linked_task(mut self, task_id: impl Into<String>) -> Self {
        self.linked_task_id = Some(task_id.into());
        self
    }

    pub fn media(mut self, media: MediaAttachment) -> Self {
        self.media = Some(media);
        self
    }

    pub fn moods(mut self, moods: Vec<Mood>) -> Self {
        self.moods = moods;
        self
    }
}

/// Fields to replace during the grace window; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterChanges {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub unlock_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub linked_task_id: Option<String>,
    #[serde(default)]
    pub media: Option<MediaAttachment>,
    #[serde(default)]
    pub moods: Option<Vec<Mood>>,
}

impl LetterChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A letter that passed the gate and was decrypted.
///
/// Only the letter manager can build one, so holding an `OpenedLetter` is
/// proof that the letter was unlocked and opened by its owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenedLetter {
    pub id: String,
    pub owner_id: OwnerId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub unlock_at: DateTime<Utc>,
    pub emotion: EmotionResult,
    pub media: Option<MediaAttachment>,
    pub moods: Vec<Mood>,
    pub response_to: Option<String>,
    pub reflection: Option<String>,
    pub(crate) opened_at: DateTime<Utc>,
}

impl OpenedLetter {
    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }
}

/// Listing entry; built without decrypting anything
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterSummary {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub unlock_at: DateTime<Utc>,
    pub lock_state: LockState,
    pub editable: bool,
    pub linked_task_id: Option<String>,
    pub response_to: Option<String>,
    pub has_reflection: bool,
}
