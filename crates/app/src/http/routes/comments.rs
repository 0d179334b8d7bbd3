use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Extension, Json};
use serde::Serialize;
use thiserror::Error;

use crate::http::comment_form::{self, CommentForm};
use crate::http::middleware::session::AuthSession;
use crate::state::AppState;
use gazette_core::domain::access::{comment_mutation_access, MutationAccess};
use gazette_core::domain::comments::Comment;
use gazette_infra::db::comments_repo::{self, CommentRecord, CommentsRepoError};

#[derive(Debug, Error)]
pub enum CommentsApiError {
    #[error("not found")]
    NotFound,
    #[error("comments repo error: {0}")]
    Comments(#[from] CommentsRepoError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub comment: Comment,
}

pub async fn edit_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(session): Extension<AuthSession>,
) -> Result<Response, CommentsApiError> {
    let Some(user) = session.user() else {
        return Ok(login_redirect(&edit_path(id)));
    };
    let record = fetch_for_owner(&state, id, user.id).await?;
    Ok(Json(CommentResponse {
        comment: to_comment(record),
    })
    .into_response())
}

pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(session): Extension<AuthSession>,
    Json(form): Json<CommentForm>,
) -> Result<Response, CommentsApiError> {
    let Some(user) = session.user() else {
        return Ok(login_redirect(&edit_path(id)));
    };
    let record = fetch_for_owner(&state, id, user.id).await?;
    let text = match comment_form::clean(&form, &state.config.forbidden_words) {
        Ok(text) => text,
        Err(response) => return Ok(response),
    };
    comments_repo::update_comment_text(&state.db, record.id, &text).await?;
    Ok(redirect_to_thread(record.news_id))
}

pub async fn delete_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(session): Extension<AuthSession>,
) -> Result<Response, CommentsApiError> {
    let Some(user) = session.user() else {
        return Ok(login_redirect(&delete_path(id)));
    };
    let record = fetch_for_owner(&state, id, user.id).await?;
    Ok(Json(CommentResponse {
        comment: to_comment(record),
    })
    .into_response())
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(session): Extension<AuthSession>,
) -> Result<Response, CommentsApiError> {
    let Some(user) = session.user() else {
        return Ok(login_redirect(&delete_path(id)));
    };
    let record = fetch_for_owner(&state, id, user.id).await?;
    comments_repo::delete_comment(&state.db, record.id).await?;
    Ok(redirect_to_thread(record.news_id))
}

/// Applies the ownership rule; a comment another user owns is reported
/// exactly like a missing one.
async fn fetch_for_owner(
    state: &AppState,
    id: i64,
    user_id: i64,
) -> Result<CommentRecord, CommentsApiError> {
    let record = comments_repo::find_comment(&state.db, id)
        .await?
        .ok_or(CommentsApiError::NotFound)?;
    match comment_mutation_access(Some(user_id), record.author_id) {
        MutationAccess::Granted => Ok(record),
        MutationAccess::Hidden | MutationAccess::LoginRequired => Err(CommentsApiError::NotFound),
    }
}

pub(crate) fn to_comment(record: CommentRecord) -> Comment {
    Comment {
        id: record.id,
        news_id: record.news_id,
        author_id: record.author_id,
        author: record.author,
        text: record.text,
        created: record.created,
    }
}

fn edit_path(id: i64) -> String {
    format!("/comments/{id}/edit")
}

fn delete_path(id: i64) -> String {
    format!("/comments/{id}/delete")
}

fn login_redirect(next: &str) -> Response {
    Redirect::to(&format!("/auth/login?next={next}")).into_response()
}

fn redirect_to_thread(news_id: i64) -> Response {
    Redirect::to(&format!("/news/{news_id}#comments")).into_response()
}

impl IntoResponse for CommentsApiError {
    fn into_response(self) -> Response {
        let status = match self {
            CommentsApiError::NotFound => StatusCode::NOT_FOUND,
            CommentsApiError::Comments(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::header::LOCATION;
    use axum::http::StatusCode;

    use super::{delete_path, edit_path, login_redirect, redirect_to_thread};

    #[test]
    fn mutation_paths_name_the_comment() {
        assert_eq!(edit_path(3), "/comments/3/edit");
        assert_eq!(delete_path(3), "/comments/3/delete");
    }

    #[test]
    fn login_redirect_carries_the_return_path() {
        let response = login_redirect("/comments/3/edit");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(LOCATION).unwrap(),
            "/auth/login?next=/comments/3/edit"
        );
    }

    #[test]
    fn thread_redirect_anchors_the_comments_section() {
        let response = redirect_to_thread(5);
        assert_eq!(
            response.headers().get(LOCATION).unwrap(),
            "/news/5#comments"
        );
    }
}
