//! Session token claims and the identity derived from them.

use serde::{Deserialize, Serialize};

use crate::repos::users::Role;

/// Claims carried by a provider-issued session token.
///
/// Everything except `exp` is optional at the wire level; which fields are
/// required depends on the caller (see [`VerifiedIdentity::from_claims`]).
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct SessionClaims {
    /// Provider user id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Expiry (seconds since epoch)
    pub exp: u64,
}

/// Identity accepted from a verified token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VerifiedIdentity {
    pub id: String,
    pub email: String,
    pub role: String,
    #[serde(rename = "Name")]
    pub name: String,
}

impl VerifiedIdentity {
    /// Returns `None` unless both `sub` and `email` are present and non-blank.
    pub fn from_claims(claims: SessionClaims) -> Option<Self> {
        let id = claims.sub.filter(|s| !s.trim().is_empty())?;
        let email = claims.email.filter(|s| !s.trim().is_empty())?;
        let role = claims
            .role
            .as_deref()
            .map(Role::parse)
            .unwrap_or(Role::User)
            .as_str()
            .to_string();
        let name = claims
            .name
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| email.clone());

        Some(Self {
            id,
            email,
            role,
            name,
        })
    }
}
