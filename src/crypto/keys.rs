//! Vault key material

use super::KEY_SIZE;
use crate::error::{Error, Result};
use hkdf::Hkdf;
use rand::RngCore;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Domain-separation salt for key derivation
const KDF_SALT: &[u8] = b"futureself-vault-v1";

/// Symmetric key for sealing records.
///
/// Zeroized on drop so key bytes do not linger in memory.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct VaultKey([u8; KEY_SIZE]);

impl VaultKey {
    /// Derive a key from a process-wide secret with HKDF-SHA256.
    ///
    /// `context` separates keys for different record kinds derived from
    /// the same secret.
    pub fn derive(secret: &str, context: &str) -> Result<Self> {
        if secret.is_empty() {
            return Err(Error::Crypto("Vault secret is empty".to_string()));
        }
        let hk = Hkdf::<Sha256>::new(Some(KDF_SALT), secret.as_bytes());
        let mut okm = [0u8; KEY_SIZE];
        hk.expand(context.as_bytes(), &mut okm)
            .map_err(|e| Error::Crypto(format!("Key derivation failed: {}", e)))?;
        let key = Self(okm);
        okm.zeroize();
        Ok(key)
    }

    /// Random key, for tests and throwaway vaults
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_SIZE];
        rand::thread_rng().fill_bytes(&mut key);
        Self(key)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("VaultKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivation_is_deterministic() {
        let a = VaultKey::derive("correct horse", "letters").unwrap();
        let b = VaultKey::derive("correct horse", "letters").unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_context_separates_keys() {
        let a = VaultKey::derive("correct horse", "letters").unwrap();
        let b = VaultKey::derive("correct horse", "diary").unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(VaultKey::derive("", "letters").is_err());
    }

    #[test]
    fn test_debug_hides_key() {
        let key = VaultKey::generate();
        assert_eq!(format!("{:?}", key), "VaultKey(..)");
        assert_ne!(key.as_bytes(), &[0u8; KEY_SIZE]);
    }
}
