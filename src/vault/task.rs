//! Tasks that can gate a letter
//!
//! Completion is monotonic: once a task is completed it stays completed,
//! and completing it again is a no-op.

use super::letter::OwnerId;
use crate::error::{Error, Result};
use crate::store::{Filter, Repository};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const TASKS: &str = "tasks";

/// A goal the writer must complete before a linked letter unlocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub owner_id: OwnerId,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Task storage keyed by id
#[derive(Clone)]
pub struct TaskRegistry {
    repo: Repository,
}

impl TaskRegistry {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Create an open task
    pub async fn add(&self, owner: &OwnerId, description: &str, now: DateTime<Utc>) -> Result<Task> {
        let description = description.trim();
        if description.is_empty() {
            return Err(Error::Validation("Task description is required".to_string()));
        }

        let task = Task {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner.clone(),
            description: description.to_string(),
            completed: false,
            created_at: now,
            completed_at: None,
        };
        self.repo.put(TASKS, &task.id, &task).await?;
        tracing::info!(task_id = %task.id, "Task added");
        Ok(task)
    }

    /// Mark a task completed. Completing an already completed task returns
    /// it unchanged.
    pub async fn complete(&self, id: &str, caller: &OwnerId, now: DateTime<Utc>) -> Result<Task> {
        let mut task = self.get_owned(id, caller).await?;
        if task.completed {
            return Ok(task);
        }

        task.completed = true;
        task.completed_at = Some(now);
        self.repo.put(TASKS, &task.id, &task).await?;
        tracing::info!(task_id = %task.id, "Task completed");
        Ok(task)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Task>> {
        self.repo.get(TASKS, id).await
    }

    /// Fetch a task that must exist and belong to `caller`
    pub async fn get_owned(&self, id: &str, caller: &OwnerId) -> Result<Task> {
        let task = self
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("task {}", id)))?;
        if &task.owner_id != caller {
            return Err(Error::NotOwner);
        }
        Ok(task)
    }

    /// Owner's tasks, oldest first
    pub async fn list(&self, owner: &OwnerId, include_completed: bool) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .repo
            .query(TASKS, &Filter::all().eq("owner_id", owner.as_str()))
            .await?;
        if !include_completed {
            tasks.retain(|t| !t.completed);
        }
        tasks.sort_by_key(|t| t.created_at);
        Ok(tasks)
    }
}
