use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;

/// Open the identity-directory pool. Runs no migrations; the `Users` table is
/// owned by the resource services.
pub async fn connect_db(database_url: &str) -> Result<DatabaseConnection, AppError> {
    let mut opts = ConnectOptions::new(database_url.to_owned());
    opts.max_connections(10)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let conn = Database::connect(opts).await.map_err(|e| {
        AppError::db(
            ErrorCode::DbUnavailable,
            format!("failed to connect to identity directory: {}", Redacted(&e.to_string())),
        )
    })?;

    info!("identity directory connected");
    Ok(conn)
}
