//! Record encryption
//!
//! Records are sealed with AES-256-GCM. The random nonce is prepended to
//! the ciphertext and the whole thing is base64 encoded, so a sealed record
//! is a plain string that fits in a JSON field.

mod keys;

pub use keys::VaultKey;

use crate::error::{Error, Result};
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::RngCore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// AES-256-GCM encryption key size
pub const KEY_SIZE: usize = 32;

/// Nonce size for AES-GCM
pub const NONCE_SIZE: usize = 12;

/// Key derivation context for vault records
pub const VAULT_CONTEXT: &str = "futureself-records";

/// Encrypt data using AES-256-GCM
pub fn encrypt(key: &[u8; KEY_SIZE], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| Error::Crypto(format!("Failed to create cipher: {}", e)))?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| Error::Crypto(format!("Encryption failed: {}", e)))?;

    let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    result.extend_from_slice(&nonce_bytes);
    result.extend_from_slice(&ciphertext);

    Ok(result)
}

/// Decrypt data using AES-256-GCM.
///
/// Any failure (truncated input, wrong key, tampering) is a
/// [`Error::DecryptionFailure`].
pub fn decrypt(key: &[u8; KEY_SIZE], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.len() < NONCE_SIZE {
        return Err(Error::DecryptionFailure);
    }

    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| Error::Crypto(format!("Failed to create cipher: {}", e)))?;

    let nonce = Nonce::from_slice(&ciphertext[..NONCE_SIZE]);
    cipher
        .decrypt(nonce, &ciphertext[NONCE_SIZE..])
        .map_err(|_| Error::DecryptionFailure)
}

/// Symmetric sealing of JSON values into opaque strings
pub trait Cipher: Send + Sync {
    fn encrypt(&self, value: &Value) -> Result<String>;

    fn decrypt(&self, ciphertext: &str) -> Result<Value>;
}

/// [`Cipher`] backed by AES-256-GCM
#[derive(Debug)]
pub struct AesGcmCipher {
    key: VaultKey,
}

impl AesGcmCipher {
    pub fn new(key: VaultKey) -> Self {
        Self { key }
    }

    /// Derive the vault key from a process-wide secret
    pub fn from_secret(secret: &str) -> Result<Self> {
        Ok(Self::new(VaultKey::derive(secret, VAULT_CONTEXT)?))
    }
}

impl Cipher for AesGcmCipher {
    fn encrypt(&self, value: &Value) -> Result<String> {
        let plaintext = serde_json::to_vec(value)?;
        let sealed = encrypt(self.key.as_bytes(), &plaintext)?;
        Ok(STANDARD.encode(sealed))
    }

    fn decrypt(&self, ciphertext: &str) -> Result<Value> {
        let sealed = STANDARD
            .decode(ciphertext.trim())
            .map_err(|_| Error::DecryptionFailure)?;
        let plaintext = decrypt(self.key.as_bytes(), &sealed)?;
        serde_json::from_slice(&plaintext).map_err(|_| Error::DecryptionFailure)
    }
}

/// Serialize and encrypt a typed payload
pub fn seal<T: Serialize>(cipher: &dyn Cipher, payload: &T) -> Result<String> {
    cipher.encrypt(&serde_json::to_value(payload)?)
}

/// Decrypt and deserialize a typed payload. A payload that decrypts but
/// does not parse counts as corrupt.
pub fn unseal<T: DeserializeOwned>(cipher: &dyn Cipher, ciphertext: &str) -> Result<T> {
    let value = cipher.decrypt(ciphertext)?;
    serde_json::from_value(value).map_err(|_| Error::DecryptionFailure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn generate_key() -> [u8; KEY_SIZE] {
        let mut key = [0u8; KEY_SIZE];
        rand::thread_rng().fill_bytes(&mut key);
        key
    }

    #[test]
    fn test_encrypt_decrypt() {
        let key = generate_key();
        let plaintext = b"Dear future me";

        let ciphertext = encrypt(&key, plaintext).unwrap();
        let decrypted = decrypt(&key, &ciphertext).unwrap();

        assert_eq!(plaintext.as_slice(), decrypted.as_slice());
    }

    #[test]
    fn test_decrypt_wrong_key() {
        let ciphertext = encrypt(&generate_key(), b"Secret message").unwrap();
        let result = decrypt(&generate_key(), &ciphertext);
        assert!(matches!(result, Err(Error::DecryptionFailure)));
    }

    #[test]
    fn test_cipher_roundtrip_json() {
        let cipher = AesGcmCipher::from_secret("s3cret").unwrap();
        let value = json!({"title": "Hi", "nested": {"n": [1, 2, 3]}, "emoji": "🌱"});

        let sealed = cipher.encrypt(&value).unwrap();
        assert!(!sealed.contains("Hi"));
        assert_eq!(cipher.decrypt(&sealed).unwrap(), value);
    }

    #[test]
    fn test_nonce_is_random() {
        let cipher = AesGcmCipher::new(VaultKey::generate());
        let value = json!("same");
        assert_ne!(cipher.encrypt(&value).unwrap(), cipher.encrypt(&value).unwrap());
    }

    #[test]
    fn test_corrupt_ciphertext() {
        let cipher = AesGcmCipher::from_secret("s3cret").unwrap();
        let other = AesGcmCipher::from_secret("different").unwrap();
        let sealed = cipher.encrypt(&json!({"a": 1})).unwrap();

        assert!(matches!(other.decrypt(&sealed), Err(Error::DecryptionFailure)));
        assert!(matches!(cipher.decrypt("not base64!"), Err(Error::DecryptionFailure)));
        assert!(matches!(cipher.decrypt("AAAA"), Err(Error::DecryptionFailure)));
    }

    #[test]
    fn test_unseal_type_mismatch_is_corrupt() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Payload {
            title: String,
        }

        let cipher = AesGcmCipher::new(VaultKey::generate());
        let sealed = seal(&cipher, &json!({"other": 1})).unwrap();
        let result: Result<Payload> = unseal(&cipher, &sealed);
        assert!(matches!(result, Err(Error::DecryptionFailure)));
    }
}
