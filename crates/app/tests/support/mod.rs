#![allow(dead_code)]

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use http_body_util::BodyExt;
use tower::util::ServiceExt;

use gazette_app::config::AppConfig;
use gazette_app::http::middleware::session;
use gazette_app::http::router;
use gazette_app::state::AppState;
use gazette_core::domain::moderation;
use gazette_infra::db::comments_repo::{self, CommentRecord};
use gazette_infra::db::{self, news_repo, users_repo};

pub const SESSION_SECRET: &str = "behavioral-suite-secret";
pub const PASSWORD: &str = "correct-horse-battery";
pub const COMMENT_TEXT: &str = "Comment text";
pub const NEW_COMMENT_TEXT: &str = "Updated comment text";

pub fn test_config() -> AppConfig {
    AppConfig {
        http_addr: "127.0.0.1:0".parse().expect("addr"),
        database_url: "sqlite::memory:".to_string(),
        session_secret: Some(SESSION_SECRET.to_string()),
        session_ttl_secs: 3600,
        home_page_size: 10,
        forbidden_words: moderation::default_forbidden_words(),
        cors_allow_origins: Vec::new(),
    }
}

pub async fn test_state() -> AppState {
    let pool = db::connect_lazy("sqlite::memory:").expect("pool");
    db::run_migrations(&pool).await.expect("migrations");
    AppState {
        config: Arc::new(test_config()),
        db: pool,
    }
}

pub fn app(state: &AppState) -> Router {
    router::build(state.clone())
}

pub async fn create_user(state: &AppState, username: &str) -> i64 {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(PASSWORD.as_bytes(), &salt)
        .expect("hash password")
        .to_string();
    users_repo::insert_user(&state.db, username, &password_hash, Utc::now())
        .await
        .expect("insert user")
}

pub async fn create_news(state: &AppState) -> i64 {
    news_repo::insert_news(&state.db, "Headline", "Body", Utc::now())
        .await
        .expect("insert news")
}

/// One item per day going backwards from today, like a live feed.
pub async fn create_news_batch(state: &AppState, count: usize) {
    let today = Utc::now();
    for index in 0..count {
        news_repo::insert_news(
            &state.db,
            &format!("Headline {index}"),
            &format!("Body {index}"),
            today - Duration::days(index as i64),
        )
        .await
        .expect("insert news");
    }
}

pub async fn create_comment(state: &AppState, news_id: i64, author_id: i64) -> i64 {
    create_comment_at(state, news_id, author_id, COMMENT_TEXT, Utc::now()).await
}

pub async fn create_comment_at(
    state: &AppState,
    news_id: i64,
    author_id: i64,
    text: &str,
    created: DateTime<Utc>,
) -> i64 {
    comments_repo::insert_comment(&state.db, news_id, author_id, text, created)
        .await
        .expect("insert comment")
}

pub async fn comment_count(state: &AppState) -> i64 {
    comments_repo::count_comments(&state.db)
        .await
        .expect("count comments")
}

pub async fn fetch_comment(state: &AppState, id: i64) -> CommentRecord {
    comments_repo::find_comment(&state.db, id)
        .await
        .expect("query comment")
        .expect("comment exists")
}

pub fn session_cookie_for(state: &AppState, user_id: i64) -> String {
    let secret = state
        .config
        .session_secret
        .as_deref()
        .expect("secret configured");
    let token = session::issue_session_token(secret, user_id, state.config.session_ttl_secs)
        .expect("issue token");
    format!("{}={token}", session::SESSION_COOKIE)
}

pub async fn get(state: &AppState, uri: &str) -> Response {
    send(state, Method::GET, uri, None, None).await
}

pub async fn get_with_cookie(state: &AppState, uri: &str, cookie: &str) -> Response {
    send(state, Method::GET, uri, Some(cookie), None).await
}

pub async fn post_json(
    state: &AppState,
    uri: &str,
    cookie: Option<&str>,
    body: serde_json::Value,
) -> Response {
    send(state, Method::POST, uri, cookie, Some(body)).await
}

pub async fn post_empty(state: &AppState, uri: &str, cookie: Option<&str>) -> Response {
    send(state, Method::POST, uri, cookie, None).await
}

async fn send(
    state: &AppState,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };
    app(state).oneshot(request).await.expect("response")
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(LOCATION)
        .expect("location header")
        .to_str()
        .expect("ascii location")
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}
