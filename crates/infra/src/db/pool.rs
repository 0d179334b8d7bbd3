use std::str::FromStr;

use sqlx::migrate::MigrateError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;

pub type DbPool = SqlitePool;

#[derive(Debug, Error)]
pub enum DbPoolError {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("sqlx migrate error: {0}")]
    Migrate(#[from] MigrateError),
}

/// SQLite takes a single writer; one pooled connection keeps writes
/// serialized and keeps `sqlite::memory:` databases alive across queries.
/// One-row liveness probe for health reporting.
pub async fn ping(pool: &DbPool) -> Result<(), DbPoolError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

pub fn connect_lazy(database_url: &str) -> Result<DbPool, DbPoolError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    Ok(SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_lazy_with(options))
}
