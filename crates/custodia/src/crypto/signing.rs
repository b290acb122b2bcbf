//! Ed25519 signing and verification.
//!
//! Signatures travel as base64 strings. Verification is fail-closed:
//! malformed base64 or a wrong-length signature verifies as `false`,
//! never as an error a caller could mishandle.

use base64::Engine;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

/// Sign a message with an Ed25519 signing key.
pub fn sign(signing_key: &SigningKey, message: &[u8]) -> Signature {
    signing_key.sign(message)
}

/// Sign a message and return the signature as a base64-encoded string.
pub fn sign_base64(signing_key: &SigningKey, message: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(sign(signing_key, message).to_bytes())
}

/// Verify a detached Ed25519 signature.
pub fn verify(verifying_key: &VerifyingKey, message: &[u8], signature: &Signature) -> bool {
    verifying_key.verify(message, signature).is_ok()
}

/// Verify a base64-encoded signature. Fail-closed on any decode error.
pub fn verify_base64(verifying_key: &VerifyingKey, message: &[u8], signature_b64: &str) -> bool {
    let Ok(sig_bytes) = base64::engine::general_purpose::STANDARD.decode(signature_b64) else {
        return false;
    };
    let Ok(sig_array) = <[u8; 64]>::try_from(sig_bytes.as_slice()) else {
        return false;
    };
    verify(verifying_key, message, &Signature::from_bytes(&sig_array))
}
