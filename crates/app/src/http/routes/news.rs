use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Extension, Json};
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use crate::http::comment_form::{self, CommentForm};
use crate::http::middleware::session::AuthSession;
use crate::http::routes::comments::to_comment;
use crate::state::AppState;
use gazette_core::domain::comments::Comment;
use gazette_core::domain::news::News;
use gazette_infra::db::comments_repo::{self, CommentsRepoError};
use gazette_infra::db::news_repo::{self, NewsRecord, NewsRepoError};

#[derive(Debug, Error)]
pub enum NewsApiError {
    #[error("not found")]
    NotFound,
    #[error("news repo error: {0}")]
    News(#[from] NewsRepoError),
    #[error("comments repo error: {0}")]
    Comments(#[from] CommentsRepoError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub news: Vec<News>,
}

#[derive(Debug, Serialize)]
pub struct NewsDetailResponse {
    pub news: News,
    pub comments: Vec<Comment>,
    pub comment_form: bool,
}

/// The home listing: at most `home_page_size` items, freshest first.
pub async fn home(State(state): State<AppState>) -> Result<Json<HomeResponse>, NewsApiError> {
    let limit = state.config.home_page_size as i64;
    let records = news_repo::list_front_page(&state.db, limit).await?;
    Ok(Json(HomeResponse {
        news: records.into_iter().map(to_news).collect(),
    }))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(session): Extension<AuthSession>,
) -> Result<Json<NewsDetailResponse>, NewsApiError> {
    let record = news_repo::find_news(&state.db, id)
        .await?
        .ok_or(NewsApiError::NotFound)?;
    Ok(Json(build_detail(&state, record, &session).await?))
}

/// Comment submission on the detail view.
///
/// Anonymous submissions are dropped without an error: the response is
/// the plain detail rendering and nothing is persisted.
pub async fn post_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(session): Extension<AuthSession>,
    Json(form): Json<CommentForm>,
) -> Result<Response, NewsApiError> {
    let record = news_repo::find_news(&state.db, id)
        .await?
        .ok_or(NewsApiError::NotFound)?;
    let Some(user) = session.user() else {
        let detail = build_detail(&state, record, &session).await?;
        return Ok(Json(detail).into_response());
    };
    let text = match comment_form::clean(&form, &state.config.forbidden_words) {
        Ok(text) => text,
        Err(response) => return Ok(response),
    };
    comments_repo::insert_comment(&state.db, record.id, user.id, &text, Utc::now()).await?;
    Ok(Redirect::to(&format!("/news/{}#comments", record.id)).into_response())
}

async fn build_detail(
    state: &AppState,
    record: NewsRecord,
    session: &AuthSession,
) -> Result<NewsDetailResponse, NewsApiError> {
    let comments = comments_repo::list_for_news(&state.db, record.id).await?;
    Ok(NewsDetailResponse {
        news: to_news(record),
        comments: comments.into_iter().map(to_comment).collect(),
        comment_form: session.is_authenticated(),
    })
}

fn to_news(record: NewsRecord) -> News {
    News {
        id: record.id,
        title: record.title,
        text: record.text,
        date: record.date,
    }
}

impl IntoResponse for NewsApiError {
    fn into_response(self) -> Response {
        let status = match self {
            NewsApiError::NotFound => StatusCode::NOT_FOUND,
            NewsApiError::News(_) | NewsApiError::Comments(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
