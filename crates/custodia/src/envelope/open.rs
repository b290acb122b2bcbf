//! Opening: unwrap, decrypt, fail closed.

use base64::Engine;
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use zeroize::Zeroizing;

use crate::crypto::derivation;
use crate::error::{CryptoError, EnvelopeError};

use super::{EncryptedPayload, FILE_KEY_SIZE, NONCE_SIZE, X25519_KEY_SIZE};

/// Open a sealed payload with the recipient's 32-byte X25519 secret key.
///
/// Fails closed with a distinct error for every malformed or tampered
/// field. A `KeyUnwrapFailed` means the recipient key is wrong or the
/// wrap metadata was corrupted; a `ContentDecryptFailed` means the bulk
/// ciphertext itself is damaged. Callers should still run
/// [`super::verify_content_hash`] on the result.
pub fn open(payload: &EncryptedPayload, recipient_secret: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
    if payload.encrypted_data.is_empty() {
        return Err(EnvelopeError::EmptyCiphertext);
    }
    let secret: [u8; X25519_KEY_SIZE] = recipient_secret.try_into().map_err(|_| {
        EnvelopeError::InvalidSecretKey(format!(
            "expected 32 bytes, got {}",
            recipient_secret.len()
        ))
    })?;

    let encrypted_key = decode_field(&payload.encrypted_key, "encrypted_key")?;
    let ephemeral_bytes = decode_field(&payload.ephemeral_public_key, "ephemeral_public_key")?;
    let ephemeral: [u8; X25519_KEY_SIZE] = ephemeral_bytes.try_into().map_err(|v: Vec<u8>| {
        EnvelopeError::InvalidFormat(format!(
            "ephemeral_public_key: expected 32 bytes, got {}",
            v.len()
        ))
    })?;
    let file_nonce = decode_nonce(&payload.file_nonce, "file_nonce")?;
    let key_nonce = decode_nonce(&payload.key_nonce, "key_nonce")?;

    // Recompute the wrap key from our secret and the sender's ephemeral key.
    let recipient_secret = x25519_dalek::StaticSecret::from(secret);
    let shared = recipient_secret.diffie_hellman(&x25519_dalek::PublicKey::from(ephemeral));
    let wrap_key = Zeroizing::new(derivation::derive_key(
        shared.as_bytes(),
        derivation::KEY_WRAP_CONTEXT,
    )?);

    let wrap_cipher = XChaCha20Poly1305::new_from_slice(wrap_key.as_slice())
        .map_err(|e| CryptoError::Cipher(format!("wrap cipher init: {e}")))?;
    let file_key = Zeroizing::new(
        wrap_cipher
            .decrypt(XNonce::from_slice(&key_nonce), encrypted_key.as_slice())
            .map_err(|_| EnvelopeError::KeyUnwrapFailed)?,
    );
    if file_key.len() != FILE_KEY_SIZE {
        return Err(EnvelopeError::KeyUnwrapFailed);
    }

    let cipher = XChaCha20Poly1305::new_from_slice(file_key.as_slice())
        .map_err(|e| CryptoError::Cipher(format!("file cipher init: {e}")))?;
    cipher
        .decrypt(
            XNonce::from_slice(&file_nonce),
            payload.encrypted_data.as_slice(),
        )
        .map_err(|_| EnvelopeError::ContentDecryptFailed)
}

fn decode_field(value: &str, field: &str) -> Result<Vec<u8>, EnvelopeError> {
    base64::engine::general_purpose::STANDARD
        .decode(value)
        .map_err(|e| EnvelopeError::InvalidFormat(format!("{field}: {e}")))
}

fn decode_nonce(value: &str, field: &str) -> Result<[u8; NONCE_SIZE], EnvelopeError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(value)
        .map_err(|e| EnvelopeError::InvalidNonce(format!("{field}: {e}")))?;
    bytes.try_into().map_err(|v: Vec<u8>| {
        EnvelopeError::InvalidNonce(format!("{field}: expected 24 bytes, got {}", v.len()))
    })
}
