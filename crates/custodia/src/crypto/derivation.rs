//! Key derivation: HKDF-SHA256 context splitting and the password KDF.
//!
//! HKDF (RFC 5869) turns one input secret into independent scoped keys
//! via context strings; the context constants below are part of the
//! persisted-data format and must remain stable. Passwords are stretched
//! with PBKDF2-HMAC-SHA256 before any key touches an AEAD.

use hkdf::Hkdf;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

use crate::error::CryptoError;

/// PBKDF2-HMAC-SHA256 iteration count for password-derived keys.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Context for deriving an identity's X25519 encryption scalar from its
/// Ed25519 seed.
pub const ENCRYPTION_KEYPAIR_CONTEXT: &str = "custodia/x25519-encryption/v1";

/// Context for deriving the envelope key-wrap key from an ECDH shared secret.
pub const KEY_WRAP_CONTEXT: &str = "custodia/envelope-key-wrap/v1";

/// Context for deriving the key-at-rest AEAD key from a password master key.
pub const KEY_AT_REST_CONTEXT: &str = "custodia/key-at-rest/v1";

/// Derive a 32-byte child key from input key material and a context string.
pub fn derive_key(ikm: &[u8], context: &str) -> Result<[u8; 32], CryptoError> {
    let hk = Hkdf::<Sha256>::new(None, ikm);
    let mut output = [0u8; 32];
    hk.expand(context.as_bytes(), &mut output)
        .map_err(|e| CryptoError::Derivation(format!("HKDF expand failed: {e}")))?;
    Ok(output)
}

/// Stretch a password into a 32-byte master key with PBKDF2-HMAC-SHA256.
///
/// Deterministic for the same password and salt; the salt must be freshly
/// random for every stored record.
pub fn derive_password_key(password: &[u8], salt: &[u8; 16]) -> [u8; 32] {
    let mut output = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password, salt, PBKDF2_ITERATIONS, &mut output);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hkdf_deterministic() {
        let ikm = [42u8; 32];
        let a = derive_key(&ikm, "test/context").unwrap();
        let b = derive_key(&ikm, "test/context").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_hkdf_different_context_different_key() {
        let ikm = [42u8; 32];
        let a = derive_key(&ikm, KEY_WRAP_CONTEXT).unwrap();
        let b = derive_key(&ikm, KEY_AT_REST_CONTEXT).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_hkdf_different_ikm_different_key() {
        let a = derive_key(&[1u8; 32], "same-context").unwrap();
        let b = derive_key(&[2u8; 32], "same-context").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_password_key_deterministic() {
        let salt = [7u8; 16];
        let a = derive_password_key(b"hunter2", &salt);
        let b = derive_password_key(b"hunter2", &salt);
        assert_eq!(a, b);
    }

    #[test]
    fn test_password_key_salt_sensitivity() {
        let a = derive_password_key(b"hunter2", &[1u8; 16]);
        let b = derive_password_key(b"hunter2", &[2u8; 16]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_password_key_wrong_password() {
        let salt = [7u8; 16];
        let a = derive_password_key(b"correct", &salt);
        let b = derive_password_key(b"wrong", &salt);
        assert_ne!(a, b);
    }
}
