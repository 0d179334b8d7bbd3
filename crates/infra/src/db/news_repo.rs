use chrono::{DateTime, Utc};
use sqlx::Row;
use thiserror::Error;

use super::DbPool;

#[derive(Debug, Error)]
pub enum NewsRepoError {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct NewsRecord {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub date: DateTime<Utc>,
}

pub async fn insert_news(
    pool: &DbPool,
    title: &str,
    text: &str,
    date: DateTime<Utc>,
) -> Result<i64, NewsRepoError> {
    let result = sqlx::query(
        r#"
        INSERT INTO news (title, text, date)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(title)
    .bind(text)
    .bind(date)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn find_news(pool: &DbPool, id: i64) -> Result<Option<NewsRecord>, NewsRepoError> {
    let row = sqlx::query(
        r#"
        SELECT id, title, text, date
        FROM news
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(map_news).transpose()
}

/// The freshest `limit` items, newest first.
pub async fn list_front_page(pool: &DbPool, limit: i64) -> Result<Vec<NewsRecord>, NewsRepoError> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, text, date
        FROM news
        ORDER BY date DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(map_news).collect()
}

pub async fn count_news(pool: &DbPool) -> Result<i64, NewsRepoError> {
    let row = sqlx::query("SELECT COUNT(*) AS cnt FROM news")
        .fetch_one(pool)
        .await?;
    Ok(row.try_get("cnt")?)
}

fn map_news(row: sqlx::sqlite::SqliteRow) -> Result<NewsRecord, NewsRepoError> {
    Ok(NewsRecord {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        text: row.try_get("text")?,
        date: row.try_get("date")?,
    })
}
