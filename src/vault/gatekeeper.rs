//! Vault gatekeeper: unlock and edit decisions
//!
//! Pure functions over a letter, its linked task and the current instant.
//! Nothing here touches storage or the clock.

use super::letter::{Letter, OwnerId};
use super::task::Task;
use super::LockState;
use crate::config::VaultConfig;
use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Utc};

/// Default edit grace window
pub const GRACE_WINDOW_MINUTES: i64 = 30;

/// Decides whether a letter may be opened or edited
#[derive(Debug, Clone, Copy)]
pub struct Gatekeeper {
    grace: Duration,
}

impl Gatekeeper {
    pub fn new(grace: Duration) -> Self {
        Self { grace }
    }

    pub fn from_config(config: &VaultConfig) -> Self {
        Self::new(config.grace_window())
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }

    /// Which unlock conditions are still outstanding at `now`.
    ///
    /// A letter linked to a task that cannot be found stays task-locked.
    pub fn lock_state(&self, letter: &Letter, now: DateTime<Utc>, task: Option<&Task>) -> LockState {
        let date_reached = now >= letter.unlock_at;
        let task_done = match &letter.linked_task_id {
            None => true,
            Some(id) => task.is_some_and(|t| &t.id == id && t.completed),
        };

        match (date_reached, task_done) {
            (true, true) => LockState::Unlocked,
            (true, false) => LockState::LockedTask,
            (false, true) => LockState::LockedDate,
            (false, false) => LockState::LockedBoth,
        }
    }

    pub fn is_unlocked(&self, letter: &Letter, now: DateTime<Utc>, task: Option<&Task>) -> bool {
        self.lock_state(letter, now, task) == LockState::Unlocked
    }

    /// Editable strictly inside the grace window, regardless of lock state
    pub fn is_editable(&self, letter: &Letter, now: DateTime<Utc>) -> bool {
        now - letter.created_at < self.grace
    }

    /// Authorize opening: owner first, then unlock conditions
    pub fn check_open(
        &self,
        letter: &Letter,
        caller: &OwnerId,
        now: DateTime<Utc>,
        task: Option<&Task>,
    ) -> Result<()> {
        if &letter.owner_id != caller {
            return Err(Error::NotOwner);
        }
        let state = self.lock_state(letter, now, task);
        tracing::debug!(letter_id = %letter.id, %state, "Open requested");
        if state.is_locked() {
            return Err(Error::StillLocked(state));
        }
        Ok(())
    }

    /// Authorize editing: owner first, then the grace window
    pub fn check_edit(&self, letter: &Letter, caller: &OwnerId, now: DateTime<Utc>) -> Result<()> {
        if &letter.owner_id != caller {
            return Err(Error::NotOwner);
        }
        let editable = self.is_editable(letter, now);
        tracing::debug!(letter_id = %letter.id, editable, "Edit requested");
        if !editable {
            return Err(Error::EditWindowExpired);
        }
        Ok(())
    }
}

impl Default for Gatekeeper {
    fn default() -> Self {
        Self::new(Duration::minutes(GRACE_WINDOW_MINUTES))
    }
}
