//! Custodia — identity, encryption, and capability authorization.
//!
//! Provides self-sovereign `did:key` identities, hybrid file encryption
//! with per-file keys wrapped for a recipient, password-protected key
//! storage with brute-force lockout, and signed, delegable, expiring
//! capability tokens.

pub mod crypto;
pub mod envelope;
pub mod error;
pub mod identity;
pub mod keystore;
pub mod linking;
pub mod time;
pub mod ucan;

// Re-export primary types
pub use error::{CryptoError, EnvelopeError, IdentityError, KeyStoreError, UcanError};
pub use identity::{derive_encryption_key_pair, is_valid_did, Did, Identity};

// Re-export encryption types
pub use crypto::{EncryptionKeyPair, SecretBytes};
pub use envelope::{open, seal, verify_content_hash, EncryptedPayload};

// Re-export key store types
pub use keystore::{
    EncryptedKeyRecord, FileBackend, KeyStore, MemoryBackend, RateLimiter, RecordBackend,
};

// Re-export capability types
pub use ucan::{
    can_read_evidence, can_upload_evidence, check_capability, create_read_capability,
    create_upload_capability, delegate_capability, delegate_capability_starting_at,
    issue_self_capability, parse_token, Action, Capability, CapabilityCheck, ResourceScope,
    UcanDelegation,
};
