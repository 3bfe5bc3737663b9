//! Media references attached to letters
//!
//! The vault never stores media bytes. An attachment is a reference (inline
//! `data:` URI or remote URL) that travels inside the encrypted payload.
//! Decoded previews handed out for an opened letter are tracked in
//! [`MediaPreviews`]. Each preview is released when its guard drops, and
//! deleting the letter releases all of them.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Audio,
    Video,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAttachment {
    pub kind: MediaKind,
    /// `data:<mime>;base64,...` or `http(s)://...`
    pub reference: String,
}

impl MediaAttachment {
    pub fn new(kind: MediaKind, reference: impl Into<String>) -> Result<Self> {
        let attachment = Self {
            kind,
            reference: reference.into(),
        };
        attachment.validate()?;
        Ok(attachment)
    }

    pub fn validate(&self) -> Result<()> {
        let reference = self.reference.trim();
        if self.is_inline() {
            let mime = reference
                .strip_prefix("data:")
                .and_then(|rest| rest.split([';', ',']).next())
                .unwrap_or_default();
            if !reference.contains(',') {
                return Err(Error::Validation("Malformed data URI".to_string()));
            }
            if !mime.is_empty() && !mime.starts_with(self.kind.as_str()) {
                return Err(Error::Validation(format!(
                    "Media type {} does not match {} attachment",
                    mime,
                    self.kind.as_str()
                )));
            }
            return Ok(());
        }
        if reference.starts_with("https://") || reference.starts_with("http://") {
            return Ok(());
        }
        Err(Error::Validation(
            "Media reference must be a data: URI or http(s) URL".to_string(),
        ))
    }

    pub fn is_inline(&self) -> bool {
        self.reference.trim_start().starts_with("data:")
    }
}

/// Live preview handles per letter
#[derive(Debug, Clone, Default)]
pub struct MediaPreviews {
    active: Arc<Mutex<HashMap<String, usize>>>,
}

impl MediaPreviews {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, usize>> {
        self.active.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Hand out one preview for `letter_id`; it is released when the guard drops
    pub fn acquire(&self, letter_id: &str) -> PreviewGuard {
        *self.lock().entry(letter_id.to_string()).or_insert(0) += 1;
        PreviewGuard {
            previews: self.clone(),
            letter_id: letter_id.to_string(),
            scope: Release::One,
        }
    }

    /// Number of live previews for `letter_id`
    pub fn active(&self, letter_id: &str) -> usize {
        self.lock().get(letter_id).copied().unwrap_or(0)
    }

    /// Guard that releases every preview of `letter_id` when dropped
    pub fn release_on_drop(&self, letter_id: &str) -> PreviewGuard {
        PreviewGuard {
            previews: self.clone(),
            letter_id: letter_id.to_string(),
            scope: Release::All,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Release {
    One,
    All,
}

/// Releases previews on drop, including on early return
pub struct PreviewGuard {
    previews: MediaPreviews,
    letter_id: String,
    scope: Release,
}

impl Drop for PreviewGuard {
    fn drop(&mut self) {
        let mut active = self.previews.lock();
        match self.scope {
            Release::One => {
                if let Some(count) = active.get_mut(&self.letter_id) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        active.remove(&self.letter_id);
                    }
                }
            }
            Release::All => {
                if let Some(count) = active.remove(&self.letter_id) {
                    tracing::debug!(letter_id = %self.letter_id, count, "Released media previews");
                }
            }
        }
    }
}
