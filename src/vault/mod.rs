//! Time- and condition-gated letter vault
//!
//! The gatekeeper decides, for a stored letter and the current instant,
//! whether it may be opened or edited. Lock state is never stored; it is
//! recomputed from the letter and its linked task on every query.

pub mod gatekeeper;
pub mod letter;
pub mod task;

pub use gatekeeper::Gatekeeper;
pub use letter::{
    Letter, LetterChanges, LetterDraft, LetterPayload, LetterSummary, OpenedLetter, OwnerId,
};
pub use task::{Task, TaskRegistry};

use serde::{Deserialize, Serialize};

/// Which unlock conditions are still outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    /// Unlock date not reached and linked task incomplete
    LockedBoth,
    /// Unlock date not reached
    LockedDate,
    /// Date reached, linked task incomplete or missing
    LockedTask,
    Unlocked,
}

impl LockState {
    pub fn is_locked(self) -> bool {
        self != Self::Unlocked
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LockedBoth => "locked_both",
            Self::LockedDate => "locked_date",
            Self::LockedTask => "locked_task",
            Self::Unlocked => "unlocked",
        }
    }
}

impl std::fmt::Display for LockState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
