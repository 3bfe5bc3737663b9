//! FutureSelf error types

use crate::vault::LockState;
use thiserror::Error;

/// FutureSelf error type
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed input (missing unlock date, too many tags, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Caller does not own the record
    #[error("Caller does not own this record")]
    NotOwner,

    /// Letter exists but its unlock conditions are not met yet
    #[error("Letter is still locked ({0})")]
    StillLocked(LockState),

    /// Letter is past its edit grace window
    #[error("Edit window has expired")]
    EditWindowExpired,

    /// Ciphertext is corrupt or was sealed with a different key
    #[error("Failed to decrypt record")]
    DecryptionFailure,

    /// No record with the requested id
    #[error("Not found: {0}")]
    NotFound(String),

    /// Durable store failure, surfaced after retries are exhausted
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Cryptographic error
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Stable machine-readable code, used by the HTTP layer
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotOwner => "NOT_OWNER",
            Self::StillLocked(_) => "STILL_LOCKED",
            Self::EditWindowExpired => "EDIT_WINDOW_EXPIRED",
            Self::DecryptionFailure => "DECRYPTION_FAILURE",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Crypto(_) => "CRYPTO_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Whether a retry could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Persistence(_) | Self::Io(_))
    }
}

/// Result type alias for FutureSelf operations
pub type Result<T> = std::result::Result<T, Error>;
