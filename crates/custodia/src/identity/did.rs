//! `did:key` identifiers for Ed25519 public keys.
//!
//! Format: `did:key:z<base58(0xED 0x01 ∥ public_key)>` — the multicodec
//! prefix marks an Ed25519 public key, `z` is the base58btc multibase
//! marker. The DID *is* the public key; no registry lookup is needed to
//! verify a signature from its holder.

use serde::{Deserialize, Serialize};

use crate::error::IdentityError;

const DID_KEY_PREFIX: &str = "did:key:z";

/// Multicodec prefix for an Ed25519 public key (0xED, varint-encoded).
const MULTICODEC_ED25519: [u8; 2] = [0xED, 0x01];

/// A `did:key` decentralized identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Did(String);

impl Did {
    /// Encode an Ed25519 public key as a `did:key` identifier.
    pub fn from_public_key(public_key: &[u8; 32]) -> Self {
        let mut prefixed = Vec::with_capacity(34);
        prefixed.extend_from_slice(&MULTICODEC_ED25519);
        prefixed.extend_from_slice(public_key);
        let encoded = bs58::encode(prefixed).into_string();
        Self(format!("{DID_KEY_PREFIX}{encoded}"))
    }

    /// Parse and structurally validate a candidate DID string.
    pub fn parse(candidate: &str) -> Result<Self, IdentityError> {
        let did = Self(candidate.to_string());
        did.public_key()?;
        Ok(did)
    }

    /// Extract the 32-byte Ed25519 public key embedded in this DID.
    pub fn public_key(&self) -> Result<[u8; 32], IdentityError> {
        let body = self
            .0
            .strip_prefix(DID_KEY_PREFIX)
            .ok_or_else(|| IdentityError::InvalidDid(format!("missing did:key:z prefix: {}", self.0)))?;

        if body.is_empty() {
            return Err(IdentityError::InvalidDid("empty did:key body".to_string()));
        }

        let decoded = bs58::decode(body)
            .into_vec()
            .map_err(|e| IdentityError::InvalidDid(format!("invalid base58: {e}")))?;

        if decoded.len() != 34 || decoded[..2] != MULTICODEC_ED25519 {
            return Err(IdentityError::InvalidDid(format!(
                "expected 34 multicodec-prefixed bytes, got {}",
                decoded.len()
            )));
        }

        let mut key = [0u8; 32];
        key.copy_from_slice(&decoded[2..]);
        Ok(key)
    }

    /// The DID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Did {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Did {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Structural check: prefix, multibase decode, and exact key length.
pub fn is_valid_did(candidate: &str) -> bool {
    Did::parse(candidate).is_ok()
}
