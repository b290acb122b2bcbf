//! Hybrid file encryption — the end-to-end envelope around evidence files.
//!
//! Every file is sealed the same way:
//!
//! 1. SHA-256 the plaintext (`content_hash`) — the integrity anchor,
//!    re-verified after decryption.
//! 2. Encrypt the bytes under a fresh random 32-byte file key with
//!    XChaCha20-Poly1305 and a fresh 24-byte nonce.
//! 3. Wrap the file key for the recipient: ephemeral X25519 pair, ECDH
//!    against the recipient's public key, HKDF-SHA256 to the wrap key,
//!    then a second AEAD pass with its own 24-byte nonce.
//! 4. The file key, wrap key, and ephemeral secret are gone the moment
//!    sealing finishes — only the holder of the recipient X25519 secret
//!    can ever unwrap the file key again (forward secrecy).
//!
//! Opening is the exact inverse and fails closed: every malformed or
//! tampered field maps to its own [`EnvelopeError`] variant so callers
//! can tell a wrong key from corrupted data.

mod open;
mod seal;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub use open::open;
pub use seal::seal;

/// File-key and wrap-key size in bytes.
pub(crate) const FILE_KEY_SIZE: usize = 32;

/// XChaCha20-Poly1305 nonce size in bytes.
pub(crate) const NONCE_SIZE: usize = 24;

/// X25519 public/secret key size in bytes.
pub(crate) const X25519_KEY_SIZE: usize = 32;

/// A sealed file plus everything the recipient needs to open it.
///
/// Binary ciphertext stays as raw bytes; key-wrap metadata travels as
/// base64 strings and the content hash as lowercase hex, matching the
/// persisted/wire shape consumed by the upload pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedPayload {
    /// XChaCha20-Poly1305 ciphertext of the file bytes.
    pub encrypted_data: Vec<u8>,
    /// Base64 AEAD ciphertext of the 32-byte file key.
    pub encrypted_key: String,
    /// Base64 ephemeral X25519 public key used for the key wrap.
    pub ephemeral_public_key: String,
    /// Base64 24-byte nonce for `encrypted_data`.
    pub file_nonce: String,
    /// Base64 24-byte nonce for `encrypted_key`.
    pub key_nonce: String,
    /// Hex SHA-256 of the plaintext, computed before encryption.
    pub content_hash: String,
    /// Plaintext length in bytes.
    pub original_size: u64,
}

/// SHA-256 of `data` as lowercase hex.
pub fn content_hash(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Compare a plaintext against an expected content hash.
///
/// Case-insensitive on the hex string. Callers run this after [`open`]
/// as defense in depth on top of the AEAD tags.
pub fn verify_content_hash(plaintext: &[u8], expected_hex: &str) -> bool {
    content_hash(plaintext).eq_ignore_ascii_case(expected_hex)
}
