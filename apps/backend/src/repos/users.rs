//! Identity directory: users keyed by email with a role and display name.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::domain::DomainError;

/// Authorization role stored in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Lenient parse of a stored role: trimmed, case-insensitive, and
    /// anything that isn't `admin` is a plain user.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::User
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

/// User domain model
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
}

impl UserRecord {
    /// Name used when addressing the user; falls back to the email.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(self.email.as_str())
    }
}

/// Lookup and first-time provisioning over the user table.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DomainError>;

    async fn create_user(&self, email: &str, role: Role) -> Result<UserRecord, DomainError>;
}

impl From<crate::entities::users::Model> for UserRecord {
    fn from(model: crate::entities::users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            role: Role::parse(&model.role),
        }
    }
}
