//! Error codes for the Co-Buy backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! Every code is SCREAMING_SNAKE_CASE and maps 1:1 to the string that
//! appears in HTTP responses.

use core::fmt;

/// Centralized error codes for the Co-Buy backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    /// Bearer token failed verification
    UnauthorizedInvalidToken,
    /// No `session` cookie on the request
    UnauthorizedNoSessionCookie,
    /// `session` cookie present but failed verification
    UnauthorizedInvalidSessionCookie,

    // Request Validation
    /// Invalid email address
    InvalidEmail,
    /// Callback invoked without a token
    MissingToken,
    /// General bad request error
    BadRequest,

    // Resource Not Found
    /// User not present in the identity directory
    UserNotFound,
    /// General not found error
    NotFound,

    // Conflicts
    /// Unique email constraint
    UniqueEmail,
    /// Generic conflict
    Conflict,

    // Upstream collaborators
    /// Identity provider returned no action link
    MagicLinkGenerationFailed,
    /// Identity provider call failed
    ProviderError,
    /// SMTP delivery failed
    EmailDeliveryFailed,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout
    DbTimeout,
    /// Internal server error
    InternalError,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidToken => "UNAUTHORIZED_INVALID_TOKEN",
            Self::UnauthorizedNoSessionCookie => "UNAUTHORIZED_NO_SESSION_COOKIE",
            Self::UnauthorizedInvalidSessionCookie => "UNAUTHORIZED_INVALID_SESSION_COOKIE",

            Self::InvalidEmail => "INVALID_EMAIL",
            Self::MissingToken => "MISSING_TOKEN",
            Self::BadRequest => "BAD_REQUEST",

            Self::UserNotFound => "USER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::UniqueEmail => "UNIQUE_EMAIL",
            Self::Conflict => "CONFLICT",

            Self::MagicLinkGenerationFailed => "MAGIC_LINK_GENERATION_FAILED",
            Self::ProviderError => "PROVIDER_ERROR",
            Self::EmailDeliveryFailed => "EMAIL_DELIVERY_FAILED",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
