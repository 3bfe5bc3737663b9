//! FutureSelf - Time-locked, emotion-aware letters to your future self
//!
//! A writer seals a letter that stays locked until a chosen date arrives
//! and, optionally, until a linked task is completed. Each letter is
//! classified for mood when it is written and encrypted at rest.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         HTTP API (axum)                       │
//! │   letters · tasks · diary · wall · insights · classify        │
//! └──────────────┬───────────────────────────────┬───────────────┘
//!                │                               │
//! ┌──────────────▼──────────────┐   ┌────────────▼──────────────┐
//! │        Lifecycle            │   │       Emotion              │
//! │  LetterManager, DiaryManager│──▶│  EmotionClassifier         │
//! │  media previews, clock      │   │  sentiment, insights       │
//! └──────┬───────────────┬──────┘   └────────────────────────────┘
//!        │               │
//! ┌──────▼──────┐  ┌─────▼───────┐  ┌────────────────────────────┐
//! │   Vault     │  │   Crypto    │  │        Wall                 │
//! │ Gatekeeper  │  │ AES-256-GCM │  │  anonymous shared letters   │
//! │ Tasks       │  │ HKDF keys   │  │  tags, moods, likes         │
//! └──────┬──────┘  └─────────────┘  └─────────────┬──────────────┘
//!        │                                         │
//! ┌──────▼─────────────────────────────────────────▼──────────────┐
//! │                   Repository (retry) + DurableStore            │
//! │                      memory · JSON files                        │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`emotion`]: Lexicon-based emotion classification and insights
//! - [`vault`]: Letter records, lock states, tasks and the gatekeeper
//! - [`lifecycle`]: Letter and diary managers
//! - [`wall`]: Public feed of anonymized letters
//! - [`crypto`]: Payload encryption at rest
//! - [`store`]: Durable record storage with retry
//! - [`api`]: HTTP API
//! - [`config`]: Configuration management

pub mod api;
pub mod config;
pub mod crypto;
pub mod emotion;
pub mod error;
pub mod lifecycle;
pub mod store;
pub mod vault;
pub mod wall;

pub use config::FutureSelfConfig;
pub use emotion::{EmotionClassifier, EmotionResult, Mood};
pub use error::{Error, Result};
pub use lifecycle::{DiaryManager, LetterManager};
pub use vault::{Gatekeeper, LockState, OwnerId};
