//! SeaORM adapter for the identity directory.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter, Set};
use tracing::info;

use crate::entities::users;
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;
use crate::logging::pii::Redacted;
use crate::repos::users::{IdentityDirectory, Role, UserRecord};

/// SeaORM implementation of [`IdentityDirectory`] over the `Users` table.
#[derive(Debug, Clone)]
pub struct UserDirectorySea {
    db: DatabaseConnection,
}

impl UserDirectorySea {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IdentityDirectory for UserDirectorySea {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DomainError> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(user.map(UserRecord::from))
    }

    async fn create_user(&self, email: &str, role: Role) -> Result<UserRecord, DomainError> {
        let user_active = users::ActiveModel {
            id: NotSet,
            email: Set(email.to_string()),
            role: Set(role.as_str().to_string()),
            name: Set(None),
        };

        let user = user_active.insert(&self.db).await.map_err(map_db_err)?;

        info!(user_id = user.id, email = %Redacted(email), role = role.as_str(), "Provisioned directory user");
        Ok(UserRecord::from(user))
    }
}
