//! In-memory SQLite identity directory.

use cobuy_backend::adapters::users_sea::UserDirectorySea;
use cobuy_backend::entities::users;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, NotSet, Schema, Set};

/// Fresh database with the `Users` table created from the entity.
pub async fn sqlite_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("connect sqlite");
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(users::Entity)))
        .await
        .expect("create Users table");
    db
}

/// Insert a row exactly as another writer of the table would, role string
/// verbatim.
pub async fn seed_user(db: &DatabaseConnection, email: &str, role: &str, name: Option<&str>) {
    users::ActiveModel {
        id: NotSet,
        email: Set(email.to_string()),
        role: Set(role.to_string()),
        name: Set(name.map(str::to_string)),
    }
    .insert(db)
    .await
    .expect("seed user");
}

pub async fn directory() -> (UserDirectorySea, DatabaseConnection) {
    let db = sqlite_db().await;
    (UserDirectorySea::new(db.clone()), db)
}
