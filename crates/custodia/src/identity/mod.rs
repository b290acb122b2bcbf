//! Self-sovereign identity — an Ed25519 key pair addressed by a DID.
//!
//! An identity is created once per device per logical user. The DID is
//! derived from the public key; the 64-byte secret (seed ∥ public key)
//! is the only thing that needs protecting, and the X25519 encryption
//! pair is re-derivable from it at any time.

pub mod did;

use base64::Engine;
use zeroize::Zeroize;

use crate::crypto::keys::{Ed25519KeyPair, EncryptionKeyPair};
use crate::crypto::secret::SecretBytes;
use crate::crypto::{derivation, signing};
use crate::error::IdentityError;

pub use did::{is_valid_did, Did};

/// A cryptographic identity: Ed25519 key pair plus its `did:key` form.
///
/// Secret key material is zeroized when the identity is dropped.
pub struct Identity {
    did: Did,
    key_pair: Ed25519KeyPair,
}

impl Identity {
    /// Generate a fresh identity. Always succeeds.
    pub fn generate() -> Self {
        let key_pair = Ed25519KeyPair::generate();
        let did = Did::from_public_key(&key_pair.verifying_key_bytes());
        Self { did, key_pair }
    }

    /// Restore an identity from its 64-byte secret key (seed ∥ public key).
    ///
    /// Pure and deterministic: the key pair is recomputed from the seed,
    /// so restoring the output of [`Identity::secret_key_bytes`] always
    /// reproduces the original DID.
    pub fn restore(secret_key: &[u8; 64]) -> Self {
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&secret_key[..32]);
        let key_pair = Ed25519KeyPair::from_seed(&seed);
        seed.zeroize();
        let did = Did::from_public_key(&key_pair.verifying_key_bytes());
        Self { did, key_pair }
    }

    /// This identity's DID.
    pub fn did(&self) -> &Did {
        &self.did
    }

    /// The Ed25519 public key bytes.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.key_pair.verifying_key_bytes()
    }

    /// The Ed25519 public key as base64.
    pub fn public_key_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(self.public_key_bytes())
    }

    /// The 64-byte secret key (seed ∥ public key) as a zero-on-drop buffer.
    pub fn secret_key_bytes(&self) -> SecretBytes {
        self.key_pair.secret_key_bytes()
    }

    /// Sign a message, returning a base64 detached signature.
    pub fn sign(&self, message: &[u8]) -> String {
        signing::sign_base64(self.key_pair.signing_key(), message)
    }

    /// Verify a base64 signature against the public key embedded in `did`.
    ///
    /// Fail-closed: malformed DIDs, bad base64, and wrong-length keys or
    /// signatures all verify as `false`.
    pub fn verify(did: &Did, signature_b64: &str, message: &[u8]) -> bool {
        let Ok(public_key) = did.public_key() else {
            return false;
        };
        let Ok(verifying_key) = Ed25519KeyPair::verifying_key_from_bytes(&public_key) else {
            return false;
        };
        signing::verify_base64(&verifying_key, message, signature_b64)
    }

    /// Derive this identity's X25519 encryption key pair.
    pub fn encryption_key_pair(&self) -> Result<EncryptionKeyPair, IdentityError> {
        let secret = self.secret_key_bytes();
        derive_encryption_key_pair(secret.as_slice())
    }

    /// Reference to the raw signing key, for token issuance.
    pub(crate) fn signing_key(&self) -> &ed25519_dalek::SigningKey {
        self.key_pair.signing_key()
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // No key material in debug output
        f.debug_struct("Identity").field("did", &self.did).finish()
    }
}

/// Derive an X25519 encryption key pair from a 64-byte Ed25519 secret key.
///
/// The X25519 scalar is HKDF-SHA256 of the 32-byte signing seed under a
/// fixed context: one-way (the signing key cannot be recovered from the
/// encryption key) and deterministic (same seed, same pair).
///
/// # Errors
///
/// Returns `IdentityError::InvalidKeyLength` unless the input is exactly
/// 64 bytes.
pub fn derive_encryption_key_pair(secret_key: &[u8]) -> Result<EncryptionKeyPair, IdentityError> {
    if secret_key.len() != 64 {
        return Err(IdentityError::InvalidKeyLength {
            expected: 64,
            actual: secret_key.len(),
        });
    }
    let scalar = derivation::derive_key(&secret_key[..32], derivation::ENCRYPTION_KEYPAIR_CONTEXT)?;
    Ok(EncryptionKeyPair::from_secret_bytes(scalar))
}
