//! Capability token issuance, encoding, and verified parsing.
//!
//! A token is `base64(JSON envelope)`, where the envelope carries the
//! claims payload plus the issuer's detached Ed25519 signature over the
//! serialized payload. Parsing verifies that signature against the key
//! embedded in the issuer DID, so a token that parses is authentic — a
//! forged or tampered token never even reaches the capability checks.

use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::UcanError;
use crate::identity::{Did, Identity};
use crate::time::now_secs;

use super::action::{Action, Capability, ResourceScope};

/// The signed claims inside a token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPayload {
    /// Issuer DID; its key signs the token.
    pub iss: Did,
    /// Audience DID; the principal allowed to exercise the grants.
    pub aud: Did,
    /// Granted capabilities.
    pub caps: Vec<Capability>,
    /// Expiration, Unix seconds. A missing expiration is treated as
    /// already expired by every check.
    pub exp: Option<u64>,
    /// Not valid before, Unix seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<u64>,
    /// Issued at, Unix seconds.
    pub iat: u64,
}

/// Wire form: payload plus issuer signature over its JSON bytes.
#[derive(Debug, Serialize, Deserialize)]
struct TokenEnvelope {
    payload: TokenPayload,
    signature: String,
}

/// An issued delegation: the opaque token plus its decoded claims.
///
/// Immutable once issued; it simply stops being usable after `expiration`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UcanDelegation {
    /// Opaque base64 token; what gets stored and transported.
    pub token: String,
    /// Content id of the token, for logs and lookups.
    pub cid: String,
    pub issuer: Did,
    pub audience: Did,
    pub capabilities: Vec<Capability>,
    pub expiration: Option<u64>,
    pub not_before: Option<u64>,
}

/// Issue a capability to the issuer itself.
///
/// With a `resource_id` the grant covers that single resource; without
/// one it covers everything under the issuer's own namespace. A negative
/// `ttl_secs` produces an already-expired token, useful only in tests.
pub fn issue_self_capability(
    identity: &Identity,
    action: Action,
    resource_id: Option<&str>,
    ttl_secs: i64,
) -> Result<UcanDelegation, UcanError> {
    let scope = match resource_id {
        Some(id) => ResourceScope::exact(identity.did(), id)
            .map_err(|e| UcanError::DelegationFailed(e.to_string()))?,
        None => ResourceScope::any(identity.did()),
    };
    issue(identity, identity.did().clone(), action, scope, ttl_secs, None)
}

/// Delegate a capability on one specific resource to another DID.
///
/// Wildcard delegation to a third party is deliberately not offered: a
/// leaked delegated token then exposes exactly one resource.
pub fn delegate_capability(
    identity: &Identity,
    audience: &Did,
    action: Action,
    resource_id: &str,
    ttl_secs: i64,
) -> Result<UcanDelegation, UcanError> {
    let scope = ResourceScope::exact(identity.did(), resource_id)
        .map_err(|e| UcanError::DelegationFailed(e.to_string()))?;
    issue(identity, audience.clone(), action, scope, ttl_secs, None)
}

/// Delegate a capability that only becomes valid at `not_before`.
///
/// Until that instant every check denies the token as not yet valid;
/// expiration still runs from issuance, so the TTL must reach past the
/// activation time for the token to ever be usable.
pub fn delegate_capability_starting_at(
    identity: &Identity,
    audience: &Did,
    action: Action,
    resource_id: &str,
    ttl_secs: i64,
    not_before: u64,
) -> Result<UcanDelegation, UcanError> {
    let scope = ResourceScope::exact(identity.did(), resource_id)
        .map_err(|e| UcanError::DelegationFailed(e.to_string()))?;
    issue(
        identity,
        audience.clone(),
        action,
        scope,
        ttl_secs,
        Some(not_before),
    )
}

fn issue(
    identity: &Identity,
    audience: Did,
    action: Action,
    scope: ResourceScope,
    ttl_secs: i64,
    not_before: Option<u64>,
) -> Result<UcanDelegation, UcanError> {
    let iat = now_secs();
    let payload = TokenPayload {
        iss: identity.did().clone(),
        aud: audience,
        caps: vec![Capability {
            can: action,
            with: scope,
        }],
        exp: Some(iat.saturating_add_signed(ttl_secs)),
        nbf: not_before,
        iat,
    };

    let payload_bytes = serde_json::to_vec(&payload)
        .map_err(|e| UcanError::DelegationFailed(format!("payload serialization: {e}")))?;
    let signature = identity.sign(&payload_bytes);

    let envelope = TokenEnvelope { payload, signature };
    let envelope_json = serde_json::to_vec(&envelope)
        .map_err(|e| UcanError::DelegationFailed(format!("envelope serialization: {e}")))?;
    let token = base64::engine::general_purpose::STANDARD.encode(&envelope_json);

    let payload = envelope.payload;
    Ok(UcanDelegation {
        cid: token_cid(&token),
        token,
        issuer: payload.iss,
        audience: payload.aud,
        capabilities: payload.caps,
        expiration: payload.exp,
        not_before: payload.nbf,
    })
}

/// Decode a token and verify the issuer's signature over its payload.
///
/// Returns the claims only when the signature checks out against the
/// issuer DID named inside the payload.
pub fn parse_token(token: &str) -> Result<TokenPayload, UcanError> {
    let envelope_json = base64::engine::general_purpose::STANDARD
        .decode(token)
        .map_err(|e| UcanError::ParseFailed(format!("invalid base64: {e}")))?;
    let envelope: TokenEnvelope = serde_json::from_slice(&envelope_json)
        .map_err(|e| UcanError::ParseFailed(format!("invalid envelope: {e}")))?;

    let payload_bytes = serde_json::to_vec(&envelope.payload)
        .map_err(|e| UcanError::ParseFailed(format!("payload serialization: {e}")))?;
    if !Identity::verify(&envelope.payload.iss, &envelope.signature, &payload_bytes) {
        return Err(UcanError::ParseFailed(
            "issuer signature verification failed".to_string(),
        ));
    }
    Ok(envelope.payload)
}

/// Short content id over the opaque token bytes.
pub fn token_cid(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("ucan_{}", bs58::encode(&digest[..16]).into_string())
}
