//! Sealing: hash, encrypt, wrap.

use base64::Engine;
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use zeroize::Zeroizing;

use crate::crypto::derivation;
use crate::crypto::keys::ephemeral_x25519;
use crate::crypto::random::{random_key_32, random_nonce_24};
use crate::error::{CryptoError, EnvelopeError};

use super::{content_hash, EncryptedPayload, X25519_KEY_SIZE};

/// Seal a file for a recipient identified by a base64 X25519 public key.
///
/// Fresh randomness everywhere: file key, both nonces, and the ephemeral
/// key pair are new on every call, so sealing the same plaintext twice
/// never repeats a ciphertext. Only `content_hash` is deterministic.
///
/// # Errors
///
/// `EmptyPlaintext` for zero-length input, `MissingRecipientKey` when the
/// key string is empty, `InvalidRecipientKey` for bad base64 or a key
/// that is not exactly 32 bytes.
pub fn seal(plaintext: &[u8], recipient_public_b64: &str) -> Result<EncryptedPayload, EnvelopeError> {
    if plaintext.is_empty() {
        return Err(EnvelopeError::EmptyPlaintext);
    }
    if recipient_public_b64.is_empty() {
        return Err(EnvelopeError::MissingRecipientKey);
    }

    let recipient_bytes = base64::engine::general_purpose::STANDARD
        .decode(recipient_public_b64)
        .map_err(|e| EnvelopeError::InvalidRecipientKey(format!("invalid base64: {e}")))?;
    let recipient: [u8; X25519_KEY_SIZE] = recipient_bytes.try_into().map_err(|v: Vec<u8>| {
        EnvelopeError::InvalidRecipientKey(format!("expected 32 bytes, got {}", v.len()))
    })?;
    let recipient_public = x25519_dalek::PublicKey::from(recipient);

    // Integrity anchor over the plaintext, before any encryption.
    let content_hash = content_hash(plaintext);

    // Bulk encryption under a fresh file key.
    let file_key = Zeroizing::new(random_key_32());
    let file_nonce = random_nonce_24();
    let cipher = XChaCha20Poly1305::new_from_slice(file_key.as_slice())
        .map_err(|e| CryptoError::Cipher(format!("file cipher init: {e}")))?;
    let encrypted_data = cipher
        .encrypt(XNonce::from_slice(&file_nonce), plaintext)
        .map_err(|e| CryptoError::Cipher(format!("file encrypt: {e}")))?;

    // Wrap the file key for the recipient. The ephemeral secret is
    // consumed by the exchange; the shared secret and wrap key zero on drop.
    let (ephemeral_secret, ephemeral_public) = ephemeral_x25519();
    let shared = ephemeral_secret.diffie_hellman(&recipient_public);
    let wrap_key = Zeroizing::new(derivation::derive_key(
        shared.as_bytes(),
        derivation::KEY_WRAP_CONTEXT,
    )?);
    let key_nonce = random_nonce_24();
    let wrap_cipher = XChaCha20Poly1305::new_from_slice(wrap_key.as_slice())
        .map_err(|e| CryptoError::Cipher(format!("wrap cipher init: {e}")))?;
    let encrypted_key = wrap_cipher
        .encrypt(XNonce::from_slice(&key_nonce), file_key.as_slice())
        .map_err(|e| CryptoError::Cipher(format!("key wrap: {e}")))?;

    let b64 = &base64::engine::general_purpose::STANDARD;
    Ok(EncryptedPayload {
        encrypted_data,
        encrypted_key: b64.encode(encrypted_key),
        ephemeral_public_key: b64.encode(ephemeral_public.as_bytes()),
        file_nonce: b64.encode(file_nonce),
        key_nonce: b64.encode(key_nonce),
        content_hash,
        original_size: plaintext.len() as u64,
    })
}
