use chrono::{DateTime, Utc};
use serde::Serialize;

/// How many items the home listing shows at most.
pub const NEWS_PER_HOME_PAGE: usize = 10;

/// A publishable article; the anchor comments attach to.
///
/// The home listing orders items by `date` descending. Items sharing a
/// date keep a stable order (newest id first).
#[derive(Debug, Clone, Serialize)]
pub struct News {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub date: DateTime<Utc>,
}
