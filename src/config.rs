//! FutureSelf configuration management

use crate::error::{Error, Result};
use crate::wall::MAX_TAGS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main FutureSelf configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FutureSelfConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Vault gating configuration
    #[serde(default)]
    pub vault: VaultConfig,

    /// Encryption configuration
    #[serde(default)]
    pub crypto: CryptoConfig,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Persistence retry configuration
    #[serde(default)]
    pub retry: RetryConfig,

    /// Emotion classifier configuration
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl FutureSelfConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the vault cannot operate with
    pub fn validate(&self) -> Result<()> {
        if self.vault.grace_minutes == 0 {
            return Err(Error::Config("vault.grace_minutes must be > 0".to_string()));
        }
        if self.vault.max_share_tags > MAX_TAGS {
            return Err(Error::Config(format!(
                "vault.max_share_tags must be at most {}",
                MAX_TAGS
            )));
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::Config("retry.max_attempts must be > 0".to_string()));
        }
        if !(0.0..=100.0).contains(&self.classifier.neutral_threshold) {
            return Err(Error::Config(
                "classifier.neutral_threshold must be within 0..=100".to_string(),
            ));
        }
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins (empty = any)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 18890,
            cors_origins: Vec::new(),
        }
    }
}

/// Vault gating configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Minutes after creation during which a letter may be edited
    pub grace_minutes: u32,

    /// Maximum number of tags on a shared letter (at most 3)
    pub max_share_tags: usize,
}

impl VaultConfig {
    /// Grace window as a chrono duration
    pub fn grace_window(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.grace_minutes))
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            grace_minutes: 30,
            max_share_tags: MAX_TAGS,
        }
    }
}

/// Encryption configuration
///
/// The secret itself never lives in the config file; `secret_env` names the
/// environment variable it is read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoConfig {
    /// Environment variable holding the vault secret
    pub secret_env: String,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            secret_env: "FUTURESELF_SECRET".to_string(),
        }
    }
}

/// Resolve the vault secret from the environment.
///
/// Tries the configured name first, then its UPPER_CASE form.
pub fn resolve_secret_from_env(crypto: &CryptoConfig) -> Result<String> {
    std::env::var(&crypto.secret_env)
        .or_else(|_| std::env::var(crypto.secret_env.to_uppercase()))
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            Error::Config(format!(
                "vault secret not set (expected ${})",
                crypto.secret_env
            ))
        })
}

/// Storage backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process memory only (for testing or ephemeral data)
    Memory,

    /// JSON files on the local filesystem
    #[default]
    File,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend type
    pub backend: StorageBackend,

    /// Base directory for file storage
    pub base_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            base_dir: dirs_next::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("futureself"),
        }
    }
}

/// Persistence retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per store call (1 = no retry)
    pub max_attempts: u32,

    /// Delay before the first retry, doubled on each further attempt
    pub backoff_ms: u64,
}

impl RetryConfig {
    /// Initial backoff as a std duration
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_ms: 50,
        }
    }
}

/// Emotion classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Top-category percentage below which the mood falls back to neutral
    pub neutral_threshold: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            neutral_threshold: 35.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FutureSelfConfig::default();
        assert_eq!(config.server.port, 18890);
        assert_eq!(config.vault.grace_minutes, 30);
        assert_eq!(config.vault.max_share_tags, 3);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_grace_window() {
        let vault = VaultConfig::default();
        assert_eq!(vault.grace_window(), chrono::Duration::minutes(30));
    }

    #[test]
    fn test_partial_toml() {
        let config: FutureSelfConfig = toml::from_str(
            r#"
            [vault]
            grace_minutes = 10
            max_share_tags = 3

            [storage]
            backend = "memory"
            base_dir = "/tmp/futureself"
            "#,
        )
        .unwrap();
        assert_eq!(config.vault.grace_minutes, 10);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.crypto.secret_env, "FUTURESELF_SECRET");
    }

    #[test]
    fn test_validate_rejects_zero_grace() {
        let mut config = FutureSelfConfig::default();
        config.vault.grace_minutes = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_caps_share_tags() {
        let mut config = FutureSelfConfig::default();
        config.vault.max_share_tags = 2;
        assert!(config.validate().is_ok());

        config.vault.max_share_tags = 5;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_rejects_too_many_share_tags() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("futureself.toml");
        std::fs::write(&path, "[vault]\ngrace_minutes = 30\nmax_share_tags = 4\n").unwrap();
        assert!(matches!(FutureSelfConfig::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nhost = \"0.0.0.0\"\nport = 9000\n").unwrap();

        let config = FutureSelfConfig::load(&path).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();
        assert!(matches!(
            FutureSelfConfig::load(&path),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_resolve_secret_missing() {
        let crypto = CryptoConfig {
            secret_env: "FUTURESELF_TEST_SECRET_THAT_IS_NOT_SET".to_string(),
        };
        assert!(resolve_secret_from_env(&crypto).is_err());
    }

    #[test]
    fn test_config_roundtrip_toml() {
        let config = FutureSelfConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: FutureSelfConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.vault.grace_minutes, config.vault.grace_minutes);
    }
}
