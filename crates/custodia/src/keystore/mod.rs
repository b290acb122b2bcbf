//! Password-protected storage for signing keys.
//!
//! The 64-byte signing key is encrypted at rest with ChaCha20-Poly1305
//! under a key stretched from the user's password:
//!
//! ```text
//! password → PBKDF2-HMAC-SHA256 (100k, fresh 16-byte salt) → master key
//! master key → HKDF-SHA256("custodia/key-at-rest/v1") → AEAD key
//! ```
//!
//! A wrong password shows up as an AEAD tag mismatch and is reported as
//! `Ok(None)` — only infrastructure failures are errors. Every failed
//! unlock feeds the per-DID [`RateLimiter`]; a lost password is
//! unrecoverable by design.

pub mod rate_limit;
pub mod record;

use std::sync::Arc;

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use log::debug;
use zeroize::Zeroizing;

use crate::crypto::derivation;
use crate::crypto::random::{random_nonce_12, random_salt_16};
use crate::crypto::secret::SecretBytes;
use crate::error::{CryptoError, KeyStoreError};
use crate::identity::Did;

pub use rate_limit::RateLimiter;
pub use record::{EncryptedKeyRecord, FileBackend, MemoryBackend, RecordBackend};

/// Password-protected key store over an injected persistence backend.
pub struct KeyStore {
    backend: Arc<dyn RecordBackend>,
    limiter: RateLimiter,
}

impl KeyStore {
    /// Create a store over a backend with its own rate limiter.
    pub fn new(backend: Arc<dyn RecordBackend>) -> Self {
        Self::with_limiter(backend, RateLimiter::new())
    }

    /// Create a store with an explicitly constructed rate limiter.
    pub fn with_limiter(backend: Arc<dyn RecordBackend>, limiter: RateLimiter) -> Self {
        Self { backend, limiter }
    }

    /// Convenience constructor for an in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Encrypt and persist a signing key under a password, overwriting
    /// any prior record for this DID. Salt and IV are fresh every call.
    pub fn store(&self, did: &Did, secret_key: &[u8], password: &str) -> Result<(), KeyStoreError> {
        let salt = random_salt_16();
        let iv = random_nonce_12();
        let aead_key = derive_record_key(password, &salt)?;

        let cipher = ChaCha20Poly1305::new_from_slice(aead_key.as_slice())
            .map_err(|e| CryptoError::Cipher(format!("cipher init: {e}")))?;
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&iv), secret_key)
            .map_err(|e| CryptoError::Cipher(format!("key encrypt: {e}")))?;

        let record = EncryptedKeyRecord {
            did: did.clone(),
            salt,
            iv,
            ciphertext,
            created_at: crate::time::now_secs() as i64,
        };
        debug!("storing {record}");
        self.backend.put(record)?;
        Ok(())
    }

    /// Decrypt and return the signing key for a DID.
    ///
    /// The rate limiter is consulted first; a locked-out DID fails with
    /// `RateLimited` before any record lookup or derivation work. A
    /// missing record or wrong password yields `Ok(None)`; only the
    /// wrong password counts as a failed attempt. Success clears all
    /// rate-limit state for the DID.
    pub fn retrieve(&self, did: &Did, password: &str) -> Result<Option<SecretBytes>, KeyStoreError> {
        self.limiter.check(did)?;

        let Some(record) = self.backend.get(did)? else {
            return Ok(None);
        };

        let aead_key = derive_record_key(password, &record.salt)?;
        let cipher = ChaCha20Poly1305::new_from_slice(aead_key.as_slice())
            .map_err(|e| CryptoError::Cipher(format!("cipher init: {e}")))?;

        match cipher.decrypt(Nonce::from_slice(&record.iv), record.ciphertext.as_slice()) {
            Ok(plaintext) => {
                self.limiter.clear(did);
                Ok(Some(SecretBytes::new(plaintext)))
            }
            Err(_) => {
                // AEAD tag mismatch: wrong password (or tampered record)
                self.limiter.record_failure(did);
                Ok(None)
            }
        }
    }

    /// Whether a record exists for this DID. Never needs the password.
    pub fn exists(&self, did: &Did) -> Result<bool, KeyStoreError> {
        Ok(self.backend.get(did)?.is_some())
    }

    /// Delete the record for this DID.
    pub fn delete(&self, did: &Did) -> Result<(), KeyStoreError> {
        self.backend.delete(did)?;
        debug!("deleted key record for {did}");
        Ok(())
    }

    /// List all DIDs with stored keys.
    pub fn list(&self) -> Result<Vec<Did>, KeyStoreError> {
        self.backend.dids()
    }

    /// Remove every stored record.
    pub fn clear_all(&self) -> Result<(), KeyStoreError> {
        self.backend.clear()
    }

    /// Confirm a password without handing out the key.
    ///
    /// Any returned key material is zeroized before this returns.
    pub fn verify_password(&self, did: &Did, password: &str) -> Result<bool, KeyStoreError> {
        // SecretBytes zeroizes when the Option drops here
        Ok(self.retrieve(did, password)?.is_some())
    }

    /// Remaining lockout seconds for a DID; `0` when unlocked.
    pub fn rate_limit_status(&self, did: &Did) -> u64 {
        self.limiter.status(did)
    }

    /// Time of the last failed unlock for a DID, Unix seconds. `None`
    /// once a successful unlock has cleared the history. Shown next to
    /// the lockout countdown in unlock dialogs.
    pub fn last_failed_attempt(&self, did: &Did) -> Option<u64> {
        self.limiter.last_attempt(did)
    }
}

/// Password → PBKDF2 master key → HKDF context split → AEAD key.
fn derive_record_key(password: &str, salt: &[u8; 16]) -> Result<Zeroizing<[u8; 32]>, KeyStoreError> {
    let master = Zeroizing::new(derivation::derive_password_key(password.as_bytes(), salt));
    let aead_key = derivation::derive_key(master.as_slice(), derivation::KEY_AT_REST_CONTEXT)?;
    Ok(Zeroizing::new(aead_key))
}
