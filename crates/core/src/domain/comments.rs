use chrono::{DateTime, Utc};
use serde::Serialize;

/// User-authored text attached to exactly one news item and one author.
///
/// `created` is assigned once at insertion; edits replace `text` only.
/// A thread lists its comments by `created` ascending, ties broken by id.
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: i64,
    pub news_id: i64,
    pub author_id: i64,
    pub author: String,
    pub text: String,
    pub created: DateTime<Utc>,
}
