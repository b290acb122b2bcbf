//! Secure random number generation.
//!
//! Uses the operating system's cryptographic random source via `rand`.

use rand::RngCore;

/// Fill a buffer with cryptographically secure random bytes.
pub fn fill_random(buf: &mut [u8]) {
    rand::thread_rng().fill_bytes(buf);
}

/// Generate a fixed-size array of cryptographically secure random bytes.
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut buf = [0u8; N];
    fill_random(&mut buf);
    buf
}

/// Generate a random 32-byte symmetric key.
pub fn random_key_32() -> [u8; 32] {
    random_bytes()
}

/// Generate a random 24-byte nonce (for XChaCha20-Poly1305).
pub fn random_nonce_24() -> [u8; 24] {
    random_bytes()
}

/// Generate a random 12-byte nonce (for ChaCha20-Poly1305).
pub fn random_nonce_12() -> [u8; 12] {
    random_bytes()
}

/// Generate a random 16-byte salt.
pub fn random_salt_16() -> [u8; 16] {
    random_bytes()
}

/// Generate a random hex-encoded nonce string (16 bytes, 32 hex chars).
///
/// Used for single-use challenge nonces where the value travels inside a
/// human-readable message.
pub fn random_nonce_hex() -> String {
    hex::encode(random_bytes::<16>())
}
