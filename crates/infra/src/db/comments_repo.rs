use chrono::{DateTime, Utc};
use sqlx::Row;
use thiserror::Error;

use super::DbPool;

#[derive(Debug, Error)]
pub enum CommentsRepoError {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct CommentRecord {
    pub id: i64,
    pub news_id: i64,
    pub author_id: i64,
    pub author: String,
    pub text: String,
    pub created: DateTime<Utc>,
}

pub async fn insert_comment(
    pool: &DbPool,
    news_id: i64,
    author_id: i64,
    text: &str,
    created: DateTime<Utc>,
) -> Result<i64, CommentsRepoError> {
    let result = sqlx::query(
        r#"
        INSERT INTO comments (news_id, author_id, text, created)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(news_id)
    .bind(author_id)
    .bind(text)
    .bind(created)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn find_comment(
    pool: &DbPool,
    id: i64,
) -> Result<Option<CommentRecord>, CommentsRepoError> {
    let row = sqlx::query(
        r#"
        SELECT c.id, c.news_id, c.author_id, u.username AS author, c.text, c.created
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(map_comment).transpose()
}

/// The whole thread of one news item, oldest first; equal timestamps
/// fall back to insertion order.
pub async fn list_for_news(
    pool: &DbPool,
    news_id: i64,
) -> Result<Vec<CommentRecord>, CommentsRepoError> {
    let rows = sqlx::query(
        r#"
        SELECT c.id, c.news_id, c.author_id, u.username AS author, c.text, c.created
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.news_id = ?
        ORDER BY c.created ASC, c.id ASC
        "#,
    )
    .bind(news_id)
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(map_comment).collect()
}

/// Edits replace the text only; created stays untouched.
pub async fn update_comment_text(
    pool: &DbPool,
    id: i64,
    text: &str,
) -> Result<(), CommentsRepoError> {
    sqlx::query(
        r#"
        UPDATE comments
        SET text = ?
        WHERE id = ?
        "#,
    )
    .bind(text)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete_comment(pool: &DbPool, id: i64) -> Result<(), CommentsRepoError> {
    sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn count_comments(pool: &DbPool) -> Result<i64, CommentsRepoError> {
    let row = sqlx::query("SELECT COUNT(*) AS cnt FROM comments")
        .fetch_one(pool)
        .await?;
    Ok(row.try_get("cnt")?)
}

fn map_comment(row: sqlx::sqlite::SqliteRow) -> Result<CommentRecord, CommentsRepoError> {
    Ok(CommentRecord {
        id: row.try_get("id")?,
        news_id: row.try_get("news_id")?,
        author_id: row.try_get("author_id")?,
        author: row.try_get("author")?,
        text: row.try_get("text")?,
        created: row.try_get("created")?,
    })
}
