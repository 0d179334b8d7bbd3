use chrono::{DateTime, Utc};
use sqlx::Row;
use thiserror::Error;

use super::DbPool;

#[derive(Debug, Error)]
pub enum UsersRepoError {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

pub async fn insert_user(
    pool: &DbPool,
    username: &str,
    password_hash: &str,
    created_at: DateTime<Utc>,
) -> Result<i64, UsersRepoError> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (username, password_hash, created_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .bind(created_at)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn find_user_by_id(
    pool: &DbPool,
    id: i64,
) -> Result<Option<UserRecord>, UsersRepoError> {
    let row = sqlx::query(
        r#"
        SELECT id, username, password_hash, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(map_user).transpose()
}

pub async fn find_user_by_username(
    pool: &DbPool,
    username: &str,
) -> Result<Option<UserRecord>, UsersRepoError> {
    let row = sqlx::query(
        r#"
        SELECT id, username, password_hash, created_at
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    row.map(map_user).transpose()
}

fn map_user(row: sqlx::sqlite::SqliteRow) -> Result<UserRecord, UsersRepoError> {
    Ok(UserRecord {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get("created_at")?,
    })
}
