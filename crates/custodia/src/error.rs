//! Error types for Custodia.
//!
//! Each module has its own error enum so callers can distinguish the
//! outcomes that matter to them: an authorization denial is a value, a
//! wrong password is `Ok(None)`, and only structural or infrastructure
//! failures surface as errors. Secret key material never appears in
//! error messages.

/// Errors shared by the low-level crypto primitives.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("key derivation failed: {0}")]
    Derivation(String),

    #[error("cipher failure: {0}")]
    Cipher(String),
}

/// Errors from DID handling and identity restoration.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("invalid DID: {0}")]
    InvalidDid(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Errors from hybrid file encryption and decryption.
///
/// Every failure mode is distinct so callers can tell "access denied"
/// (`KeyUnwrapFailed`) from "data corrupted" (`ContentDecryptFailed`).
/// All of these are expected, recoverable conditions.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("cannot encrypt an empty file")]
    EmptyPlaintext,

    #[error("cannot decrypt an empty ciphertext")]
    EmptyCiphertext,

    #[error("recipient public key is missing")]
    MissingRecipientKey,

    #[error("invalid recipient public key: {0}")]
    InvalidRecipientKey(String),

    #[error("invalid recipient secret key: {0}")]
    InvalidSecretKey(String),

    #[error("malformed payload field: {0}")]
    InvalidFormat(String),

    #[error("invalid nonce in field: {0}")]
    InvalidNonce(String),

    #[error("failed to unwrap file key (wrong recipient key or corrupted key metadata)")]
    KeyUnwrapFailed,

    #[error("failed to decrypt file content (corrupted ciphertext or nonce)")]
    ContentDecryptFailed,

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Errors from the password-protected key store.
///
/// A wrong password is not an error (`retrieve` returns `Ok(None)`); the
/// only expected error a caller must handle specially is `RateLimited`,
/// which carries the remaining lockout so a UI can show a countdown.
#[derive(Debug, thiserror::Error)]
pub enum KeyStoreError {
    #[error("too many failed attempts, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Errors from capability token issuance and parsing.
///
/// Authorization denial is never an error: `check_capability` returns a
/// `CapabilityCheck` value carrying a human-readable reason instead.
#[derive(Debug, thiserror::Error)]
pub enum UcanError {
    #[error("capability delegation failed: {0}")]
    DelegationFailed(String),

    #[error("capability token parse failed: {0}")]
    ParseFailed(String),
}

impl UcanError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DelegationFailed(_) => "UCAN_DELEGATION_FAILED",
            Self::ParseFailed(_) => "UCAN_PARSE_FAILED",
        }
    }
}
