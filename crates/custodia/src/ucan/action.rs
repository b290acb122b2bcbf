//! Actions, resource scopes, and the capability pairs built from them.
//!
//! Actions are a closed enum and resources are structured scopes rather
//! than free-form strings, so capability matching is exact matching on
//! parsed values — there is no substring or suffix logic to get wrong.

use serde::{Deserialize, Serialize};

use crate::error::UcanError;
use crate::identity::{is_valid_did, Did};

/// The rendered separator between a scope's issuer DID and its selector.
const RESOURCE_INFIX: &str = ":evidence/";

/// An action a capability can authorize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Upload,
    Read,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Read => "read",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Action {
    type Err = UcanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upload" => Ok(Self::Upload),
            "read" => Ok(Self::Read),
            "delete" => Ok(Self::Delete),
            other => Err(UcanError::ParseFailed(format!("unknown action: {other}"))),
        }
    }
}

/// Which resources under an issuer's namespace a scope selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceSelector {
    /// A single resource id.
    Exact(String),
    /// Every resource the issuer namespaces.
    Any,
}

/// A resource scope: an issuer DID plus a selector under its namespace.
///
/// Rendered as `<issuer-did>:evidence/<id>` or `<issuer-did>:evidence/*`.
/// A principal can only scope resources under its own DID, so a grant can
/// never name another principal's namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceScope {
    issuer: Did,
    selector: ResourceSelector,
}

impl ResourceScope {
    /// Scope over a single resource id.
    ///
    /// Ids are opaque tokens: empty ids and ids containing `/`, `:` or
    /// `*` are rejected so a crafted id cannot masquerade as a wildcard
    /// or escape into another namespace.
    pub fn exact(issuer: &Did, resource_id: &str) -> Result<Self, UcanError> {
        validate_resource_id(resource_id)?;
        Ok(Self {
            issuer: issuer.clone(),
            selector: ResourceSelector::Exact(resource_id.to_string()),
        })
    }

    /// Wildcard scope over everything the issuer namespaces.
    pub fn any(issuer: &Did) -> Self {
        Self {
            issuer: issuer.clone(),
            selector: ResourceSelector::Any,
        }
    }

    pub fn issuer(&self) -> &Did {
        &self.issuer
    }

    pub fn selector(&self) -> &ResourceSelector {
        &self.selector
    }

    /// Whether this scope covers a requested resource id.
    pub fn covers(&self, resource_id: &str) -> bool {
        match &self.selector {
            ResourceSelector::Any => validate_resource_id(resource_id).is_ok(),
            ResourceSelector::Exact(id) => id == resource_id,
        }
    }

    /// Parse the rendered `<did>:evidence/<selector>` form.
    pub fn parse(s: &str) -> Result<Self, UcanError> {
        let infix = s
            .rfind(RESOURCE_INFIX)
            .ok_or_else(|| UcanError::ParseFailed(format!("malformed resource scope: {s}")))?;
        let issuer = &s[..infix];
        let selector = &s[infix + RESOURCE_INFIX.len()..];

        if !is_valid_did(issuer) {
            return Err(UcanError::ParseFailed(format!(
                "resource scope issuer is not a valid DID: {issuer}"
            )));
        }
        let issuer = Did::parse(issuer)
            .map_err(|e| UcanError::ParseFailed(format!("resource scope issuer: {e}")))?;

        let selector = if selector == "*" {
            ResourceSelector::Any
        } else {
            validate_resource_id(selector)?;
            ResourceSelector::Exact(selector.to_string())
        };
        Ok(Self { issuer, selector })
    }
}

impl std::fmt::Display for ResourceScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.selector {
            ResourceSelector::Exact(id) => write!(f, "{}{RESOURCE_INFIX}{id}", self.issuer),
            ResourceSelector::Any => write!(f, "{}{RESOURCE_INFIX}*", self.issuer),
        }
    }
}

impl From<ResourceScope> for String {
    fn from(scope: ResourceScope) -> Self {
        scope.to_string()
    }
}

impl TryFrom<String> for ResourceScope {
    type Error = UcanError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

fn validate_resource_id(id: &str) -> Result<(), UcanError> {
    if id.is_empty() {
        return Err(UcanError::ParseFailed("empty resource id".to_string()));
    }
    if id.contains(['/', ':', '*']) {
        return Err(UcanError::ParseFailed(format!(
            "resource id contains reserved characters: {id}"
        )));
    }
    Ok(())
}

/// One granted `{action, resource}` pair inside a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    /// The authorized action.
    pub can: Action,
    /// The resource scope it applies to.
    pub with: ResourceScope,
}

impl Capability {
    /// Whether this capability grants `action`, optionally on a specific
    /// resource. With no resource id the check is action-only.
    pub fn grants(&self, action: Action, resource_id: Option<&str>) -> bool {
        if self.can != action {
            return false;
        }
        match resource_id {
            Some(id) => self.with.covers(id),
            None => true,
        }
    }
}
