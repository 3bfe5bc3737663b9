//! Letter and diary lifecycle
//!
//! Managers that own every state transition of a sealed record. They
//! depend on the emotion classifier, the vault gatekeeper, a cipher and a
//! repository, all injected at construction.

pub mod clock;
pub mod diary;
pub mod letters;
pub mod media;

pub use clock::{Clock, ManualClock, SystemClock};
pub use diary::{DiaryEntry, DiaryManager, DiaryView};
pub use letters::LetterManager;
pub use media::{MediaAttachment, MediaKind, MediaPreviews, PreviewGuard};
