//! Storage-agnostic error raised by the identity directory.
//!
//! Adapters translate driver errors into this type (see
//! `infra::db_errors`); handlers see it only as an `AppError` through
//! `From<DomainError>`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    DbUnavailable,
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    User,
    Record,
}

/// Which uniqueness rule a write broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    /// `Users.Email` already taken, typically by a concurrent first request
    UniqueEmail,
    UniqueOther,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("conflict ({0:?}): {1}")]
    Conflict(ConflictKind, String),
    #[error("not found ({0:?}): {1}")]
    NotFound(NotFoundKind, String),
    #[error("infra ({0:?}): {1}")]
    Infra(InfraErrorKind, String),
}

impl DomainError {
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }

    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }

    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }
}
