//! Capability satisfaction checks.
//!
//! Denial is a value, not an error: every path through
//! [`check_capability`] produces a [`CapabilityCheck`] whose `reason`
//! names the first check that failed. Checks run in a fixed order —
//! signature, expiration, not-before, audience, grant match — and
//! short-circuit on the first failure.

use log::debug;

use crate::identity::Did;
use crate::time::now_secs;

use super::action::Action;
use super::token::{issue_self_capability, parse_token, UcanDelegation};
use crate::error::UcanError;
use crate::identity::Identity;

/// Default TTL for upload capabilities: one hour.
pub const UPLOAD_CAPABILITY_TTL_SECS: i64 = 3600;

/// Default TTL for read capabilities: one day.
pub const READ_CAPABILITY_TTL_SECS: i64 = 86_400;

/// Outcome of a capability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityCheck {
    pub allowed: bool,
    /// Why the check failed; `None` when allowed.
    pub reason: Option<String>,
}

impl CapabilityCheck {
    fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    fn denied(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        debug!("capability check denied: {reason}");
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }
}

/// Check whether `token` authorizes `action`, optionally on a specific
/// resource and for a specific requester DID.
///
/// A token with no expiration is treated as expired. When a requester is
/// supplied it must be the token's audience; the self-issued case is
/// covered because there issuer and audience are the same DID.
pub fn check_capability(
    token: &str,
    action: Action,
    resource_id: Option<&str>,
    requester: Option<&Did>,
) -> CapabilityCheck {
    let payload = match parse_token(token) {
        Ok(payload) => payload,
        Err(e) => return CapabilityCheck::denied(format!("invalid token: {e}")),
    };

    let now = now_secs();
    match payload.exp {
        None => return CapabilityCheck::denied("token has no expiration, treated as expired"),
        Some(exp) if exp <= now => return CapabilityCheck::denied("token has expired"),
        Some(_) => {}
    }
    if let Some(nbf) = payload.nbf {
        if nbf > now {
            return CapabilityCheck::denied("token is not yet valid");
        }
    }
    if let Some(requester) = requester {
        if requester != &payload.aud {
            return CapabilityCheck::denied(format!(
                "requester {requester} is not the token audience"
            ));
        }
    }
    if payload
        .caps
        .iter()
        .any(|cap| cap.grants(action, resource_id))
    {
        CapabilityCheck::allowed()
    } else {
        CapabilityCheck::denied(match resource_id {
            Some(id) => format!("no capability grants {action} on {id}"),
            None => format!("no capability grants {action}"),
        })
    }
}

/// Self-issue an upload capability with the default one-hour TTL.
pub fn create_upload_capability(
    identity: &Identity,
    resource_id: Option<&str>,
) -> Result<UcanDelegation, UcanError> {
    issue_self_capability(identity, Action::Upload, resource_id, UPLOAD_CAPABILITY_TTL_SECS)
}

/// Self-issue a read capability with the default one-day TTL.
pub fn create_read_capability(
    identity: &Identity,
    resource_id: Option<&str>,
) -> Result<UcanDelegation, UcanError> {
    issue_self_capability(identity, Action::Read, resource_id, READ_CAPABILITY_TTL_SECS)
}

/// Whether `token` authorizes an evidence upload.
pub fn can_upload_evidence(token: &str) -> bool {
    check_capability(token, Action::Upload, None, None).allowed
}

/// Whether `token` authorizes reading a specific piece of evidence.
pub fn can_read_evidence(token: &str, resource_id: &str) -> bool {
    check_capability(token, Action::Read, Some(resource_id), None).allowed
}
