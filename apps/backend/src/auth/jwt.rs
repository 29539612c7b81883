use std::fmt;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::auth::claims::{SessionClaims, VerifiedIdentity};
use crate::state::security_config::SecurityConfig;

/// Why a presented token was not accepted.
///
/// Only ever logged; clients receive a generic "invalid or expired" detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    Expired,
    InvalidSignature,
    InvalidAudience,
    Malformed,
    MissingClaims,
}

impl TokenRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenRejection::Expired => "token_expired",
            TokenRejection::InvalidSignature => "invalid_signature",
            TokenRejection::InvalidAudience => "invalid_audience",
            TokenRejection::Malformed => "invalid_token",
            TokenRejection::MissingClaims => "missing_claims",
        }
    }
}

impl fmt::Display for TokenRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn decode_claims(token: &str, security: &SecurityConfig) -> Result<SessionClaims, TokenRejection> {
    // Default validation checks exp; the algorithm is pinned to the configured one.
    let mut validation = Validation::new(security.algorithm);
    match &security.audience {
        Some(aud) => validation.set_audience(&[aud]),
        None => validation.validate_aud = false,
    }

    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenRejection::Expired,
        ErrorKind::InvalidSignature => TokenRejection::InvalidSignature,
        ErrorKind::InvalidAudience => TokenRejection::InvalidAudience,
        _ => TokenRejection::Malformed,
    })
}

/// Verify a session token and extract the caller's identity.
///
/// Signature, expiry and (when configured) audience must check out, and both
/// `sub` and `email` must be present.
pub fn verify_session_token(
    token: &str,
    security: &SecurityConfig,
) -> Result<VerifiedIdentity, TokenRejection> {
    let claims = decode_claims(token, security)?;
    VerifiedIdentity::from_claims(claims).ok_or(TokenRejection::MissingClaims)
}

/// Verify a token for promotion into a session cookie. Only `sub` is required.
pub fn verify_token_subject(
    token: &str,
    security: &SecurityConfig,
) -> Result<SessionClaims, TokenRejection> {
    let claims = decode_claims(token, security)?;
    match claims.sub.as_deref() {
        Some(sub) if !sub.trim().is_empty() => Ok(claims),
        _ => Err(TokenRejection::MissingClaims),
    }
}
