// src/services/encryption.rs
//! AES-256-GCM sealing for secrets kept in `system_settings`.
//!
//! Sealed values are `base64(nonce || ciphertext)` with a 12 byte nonce.

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::RngCore;
use std::env;
use thiserror::Error;

const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum EncryptionError {
    #[error("ENCRYPTION_MASTER_KEY is not set")]
    KeyNotConfigured,

    #[error("Encryption key must be base64 of exactly {KEY_LEN} bytes")]
    InvalidKeyFormat,

    #[error("Encryption failed")]
    EncryptionFailed,

    #[error("Decryption failed: {0}")]
    DecryptionFailed(&'static str),
}

pub struct EncryptionService {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for EncryptionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EncryptionService(<redacted>)")
    }
}

impl EncryptionService {
    pub fn from_env() -> Result<Self, EncryptionError> {
        let key = env::var("ENCRYPTION_MASTER_KEY").map_err(|_| EncryptionError::KeyNotConfigured)?;
        Self::from_key(key.trim())
    }

    pub fn from_key(encoded: &str) -> Result<Self, EncryptionError> {
        let bytes = BASE64
            .decode(encoded.as_bytes())
            .map_err(|_| EncryptionError::InvalidKeyFormat)?;
        if bytes.len() != KEY_LEN {
            return Err(EncryptionError::InvalidKeyFormat);
        }

        Ok(Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&bytes)),
        })
    }

    /// A fresh random key, base64 encoded, suitable for `ENCRYPTION_MASTER_KEY`.
    pub fn generate_key() -> String {
        let mut key = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        BASE64.encode(key)
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String, EncryptionError> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let sealed = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|_| EncryptionError::EncryptionFailed)?;

        let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&sealed);
        Ok(BASE64.encode(out))
    }

    pub fn decrypt(&self, encoded: &str) -> Result<String, EncryptionError> {
        let raw = BASE64
            .decode(encoded.as_bytes())
            .map_err(|_| EncryptionError::DecryptionFailed("not base64"))?;
        if raw.len() <= NONCE_LEN {
            return Err(EncryptionError::DecryptionFailed("value too short"));
        }

        let (nonce, sealed) = raw.split_at(NONCE_LEN);
        let opened = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| EncryptionError::DecryptionFailed("authentication failed"))?;

        String::from_utf8(opened).map_err(|_| EncryptionError::DecryptionFailed("invalid UTF-8"))
    }
}
