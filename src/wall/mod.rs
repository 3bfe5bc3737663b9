//! Public letter wall
//!
//! A shared letter is a redacted copy: content, tags and mood only. It gets
//! a fresh id and carries nothing that links it back to the writer or the
//! source letter.

use crate::emotion::Mood;
use crate::error::{Error, Result};
use crate::store::{Filter, Repository};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;

const WALL: &str = "wall";
const LIKES: &str = "wall_likes";

/// Default maximum number of tags on a shared letter
pub const MAX_TAGS: usize = 3;

/// Anonymized public projection of an opened letter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedLetter {
    pub id: String,
    pub content: String,
    pub tags: Vec<String>,
    pub mood: Mood,
    pub published_at: DateTime<Utc>,
}

/// Wall listing entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallEntry {
    #[serde(flatten)]
    pub letter: SharedLetter,
    pub likes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LikeCount {
    id: String,
    count: u64,
}

/// Listing filter; every set field must match
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WallFilter {
    pub tag: Option<String>,
    pub mood: Option<Mood>,
    /// Case-insensitive substring of the content
    pub search: Option<String>,
}

impl WallFilter {
    fn matches(&self, letter: &SharedLetter) -> bool {
        if let Some(tag) = &self.tag {
            let tag = normalize_tag(tag);
            if !letter.tags.iter().any(|t| *t == tag) {
                return false;
            }
        }
        if let Some(mood) = self.mood {
            if letter.mood != mood {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.trim().to_lowercase();
            if !needle.is_empty() && !letter.content.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().trim_start_matches('#').trim().to_lowercase()
}

/// Public feed of shared letters
#[derive(Clone)]
pub struct LetterWall {
    repo: Repository,
    max_tags: usize,
    likes_lock: Arc<Mutex<()>>,
}

impl LetterWall {
    pub fn new(repo: Repository, max_tags: usize) -> Self {
        Self {
            repo,
            max_tags,
            likes_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Trim, lowercase and strip `#`; reject blank or duplicate tags and
    /// more than the allowed count
    pub fn normalize_tags(&self, tags: &[String]) -> Result<Vec<String>> {
        if tags.len() > self.max_tags {
            return Err(Error::Validation(format!(
                "At most {} tags allowed, got {}",
                self.max_tags,
                tags.len()
            )));
        }

        let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
        for tag in tags {
            let tag = normalize_tag(tag);
            if tag.is_empty() {
                return Err(Error::Validation("Tags must not be blank".to_string()));
            }
            if normalized.contains(&tag) {
                return Err(Error::Validation(format!("Duplicate tag: {}", tag)));
            }
            normalized.push(tag);
        }
        Ok(normalized)
    }

    /// Publish a redacted letter under a fresh id
    pub async fn publish(
        &self,
        content: &str,
        mood: Mood,
        tags: &[String],
        now: DateTime<Utc>,
    ) -> Result<SharedLetter> {
        let tags = self.normalize_tags(tags)?;
        if content.trim().is_empty() {
            return Err(Error::Validation("Shared content is empty".to_string()));
        }

        let shared = SharedLetter {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.to_string(),
            tags,
            mood,
            published_at: now,
        };
        self.repo.put(WALL, &shared.id, &shared).await?;
        tracing::info!(shared_id = %shared.id, %mood, "Letter published to wall");
        Ok(shared)
    }

    /// Matching letters, newest first
    pub async fn list(&self, filter: &WallFilter) -> Result<Vec<WallEntry>> {
        let mut letters: Vec<SharedLetter> = self.repo.query(WALL, &Filter::all()).await?;
        letters.retain(|l| filter.matches(l));
        letters.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        let likes: HashMap<String, u64> = self
            .repo
            .query::<LikeCount>(LIKES, &Filter::all())
            .await?
            .into_iter()
            .map(|l| (l.id, l.count))
            .collect();

        Ok(letters
            .into_iter()
            .map(|letter| WallEntry {
                likes: likes.get(&letter.id).copied().unwrap_or(0),
                letter,
            })
            .collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<SharedLetter>> {
        self.repo.get(WALL, id).await
    }

    /// Add a like, returning the new count
    pub async fn like(&self, id: &str) -> Result<u64> {
        if self.get(id).await?.is_none() {
            return Err(Error::NotFound(format!("shared letter {}", id)));
        }

        let _guard = self.likes_lock.lock().await;
        let current = self
            .repo
            .get::<LikeCount>(LIKES, id)
            .await?
            .map_or(0, |l| l.count);
        let like = LikeCount {
            id: id.to_string(),
            count: current + 1,
        };
        self.repo.put(LIKES, id, &like).await?;
        Ok(like.count)
    }

    /// Distinct tags in use, sorted
    pub async fn tags(&self) -> Result<Vec<String>> {
        let letters: Vec<SharedLetter> = self.repo.query(WALL, &Filter::all()).await?;
        let tags: BTreeSet<String> = letters.into_iter().flat_map(|l| l.tags).collect();
        Ok(tags.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn wall() -> LetterWall {
        LetterWall::new(Repository::in_memory(), MAX_TAGS)
    }

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|t| t.to_string()).collect()
    }

    #[tokio::test]
    async fn test_publish_has_no_linkage_fields() {
        let wall = wall();
        let shared = wall
            .publish("You made it.", Mood::Hope, &tags(&["#Growth"]), Utc::now())
            .await
            .unwrap();

        let json = serde_json::to_value(&shared).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 5);
        for forbidden in ["ownerId", "owner_id", "unlockAt", "unlock_at", "linkedTaskId"] {
            assert!(json.get(forbidden).is_none(), "{} leaked", forbidden);
        }
        assert_eq!(shared.tags, vec!["growth"]);
    }

    #[tokio::test]
    async fn test_tag_rules() {
        let wall = wall();
        let now = Utc::now();
        for bad in [
            tags(&["a", "b", "c", "d"]),
            tags(&["a", "  "]),
            tags(&["Hope", "#hope"]),
        ] {
            let err = wall.publish("text", Mood::Joy, &bad, now).await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }
        assert!(wall.publish("text", Mood::Joy, &[], now).await.is_ok());
        assert!(wall
            .publish("text", Mood::Joy, &tags(&["a", "b", "c"]), now)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_list_filters_and_order() {
        let wall = wall();
        let now = Utc::now();
        wall.publish("First steps", Mood::Hope, &tags(&["growth"]), now)
            .await
            .unwrap();
        wall.publish(
            "Rough week",
            Mood::Sadness,
            &tags(&["work"]),
            now + Duration::minutes(1),
        )
        .await
        .unwrap();
        wall.publish(
            "Growing slowly",
            Mood::Hope,
            &tags(&["growth", "work"]),
            now + Duration::minutes(2),
        )
        .await
        .unwrap();

        let all = wall.list(&WallFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].letter.content, "Growing slowly");

        let growth = WallFilter {
            tag: Some("#Growth".into()),
            ..Default::default()
        };
        assert_eq!(wall.list(&growth).await.unwrap().len(), 2);

        let hopeful_work = WallFilter {
            tag: Some("work".into()),
            mood: Some(Mood::Hope),
            ..Default::default()
        };
        assert_eq!(wall.list(&hopeful_work).await.unwrap().len(), 1);

        let search = WallFilter {
            search: Some("ROUGH".into()),
            ..Default::default()
        };
        assert_eq!(wall.list(&search).await.unwrap()[0].letter.mood, Mood::Sadness);
    }

    #[tokio::test]
    async fn test_likes() {
        let wall = wall();
        let shared = wall
            .publish("hi", Mood::Joy, &[], Utc::now())
            .await
            .unwrap();

        assert_eq!(wall.like(&shared.id).await.unwrap(), 1);
        assert_eq!(wall.like(&shared.id).await.unwrap(), 2);
        let listed = wall.list(&WallFilter::default()).await.unwrap();
        assert_eq!(listed[0].likes, 2);

        assert!(matches!(wall.like("nope").await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_distinct_tags() {
        let wall = wall();
        let now = Utc::now();
        wall.publish("a", Mood::Joy, &tags(&["work", "growth"]), now)
            .await
            .unwrap();
        wall.publish("b", Mood::Joy, &tags(&["growth"]), now)
            .await
            .unwrap();
        assert_eq!(wall.tags().await.unwrap(), vec!["growth", "work"]);
    }
}
