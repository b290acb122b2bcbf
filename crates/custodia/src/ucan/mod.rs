//! UCAN-style capability tokens: signed, delegable, expiring grants.
//!
//! An issuer signs a token naming an audience DID and a set of
//! `{action, resource}` capabilities scoped under the issuer's own DID
//! namespace. Tokens are immutable once issued and become unusable at
//! expiration; there is no revocation.

pub mod action;
pub mod check;
pub mod token;

pub use action::{Action, Capability, ResourceScope, ResourceSelector};
pub use check::{
    can_read_evidence, can_upload_evidence, check_capability, create_read_capability,
    create_upload_capability, CapabilityCheck, READ_CAPABILITY_TTL_SECS,
    UPLOAD_CAPABILITY_TTL_SECS,
};
pub use token::{
    delegate_capability, delegate_capability_starting_at, issue_self_capability, parse_token,
    token_cid, TokenPayload, UcanDelegation,
};
