use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::middleware::session;
use crate::state::AppState;
use gazette_infra::db::users_repo::{self, UsersRepoError};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct NextParams {
    pub next: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuthApiError {
    #[error("session auth not configured")]
    MissingConfig,
    #[error("username is required")]
    MissingUsername,
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,
    #[error("username is already taken")]
    UsernameTaken,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("password hashing failed")]
    Hash,
    #[error("token issuance failed")]
    TokenIssue,
    #[error("users repo error: {0}")]
    Users(#[from] UsersRepoError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
pub struct LoginPageResponse {
    pub next: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignupPageResponse {
    pub min_password_length: usize,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub status: &'static str,
}

pub async fn login_page(Query(params): Query<NextParams>) -> Json<LoginPageResponse> {
    Json(LoginPageResponse { next: params.next })
}

pub async fn login(
    State(state): State<AppState>,
    Query(params): Query<NextParams>,
    headers: HeaderMap,
    Json(credentials): Json<Credentials>,
) -> Result<Response, AuthApiError> {
    let secret = state
        .config
        .session_secret
        .as_deref()
        .filter(|value| !value.is_empty())
        .ok_or(AuthApiError::MissingConfig)?;
    let username = credentials.username.trim();
    if username.is_empty() {
        return Err(AuthApiError::MissingUsername);
    }

    // Unknown usernames and wrong passwords are indistinguishable.
    let user = users_repo::find_user_by_username(&state.db, username)
        .await?
        .ok_or(AuthApiError::InvalidCredentials)?;
    let parsed_hash =
        PasswordHash::new(&user.password_hash).map_err(|_| AuthApiError::InvalidCredentials)?;
    if Argon2::default()
        .verify_password(credentials.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AuthApiError::InvalidCredentials);
    }

    let max_age = state.config.session_ttl_secs;
    let token = session::issue_session_token(secret, user.id, max_age)
        .map_err(|_| AuthApiError::TokenIssue)?;
    let cookie = session::build_session_cookie(&token, max_age, session::is_https(&headers));
    let response = Redirect::to(&redirect_target(params.next.as_deref())).into_response();
    Ok(session::attach_cookie(response, cookie))
}

pub async fn logout() -> Response {
    let response = Json(LogoutResponse {
        status: "signed out",
    })
    .into_response();
    session::attach_cookie(response, session::clear_session_cookie())
}

pub async fn signup_page() -> Json<SignupPageResponse> {
    Json(SignupPageResponse {
        min_password_length: MIN_PASSWORD_LEN,
    })
}

pub async fn signup(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Response, AuthApiError> {
    let username = credentials.username.trim();
    if username.is_empty() {
        return Err(AuthApiError::MissingUsername);
    }
    if credentials.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthApiError::PasswordTooShort);
    }
    if users_repo::find_user_by_username(&state.db, username)
        .await?
        .is_some()
    {
        return Err(AuthApiError::UsernameTaken);
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(credentials.password.as_bytes(), &salt)
        .map_err(|_| AuthApiError::Hash)?
        .to_string();
    users_repo::insert_user(&state.db, username, &password_hash, Utc::now()).await?;
    Ok(Redirect::to("/auth/login").into_response())
}

/// Only local paths are followed after login; anything else goes home.
fn redirect_target(next: Option<&str>) -> String {
    match next {
        Some(next) if next.starts_with('/') && !next.starts_with("//") => next.to_string(),
        _ => "/".to_string(),
    }
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthApiError::MissingConfig => StatusCode::SERVICE_UNAVAILABLE,
            AuthApiError::MissingUsername | AuthApiError::PasswordTooShort => {
                StatusCode::BAD_REQUEST
            }
            AuthApiError::UsernameTaken => StatusCode::CONFLICT,
            AuthApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthApiError::Hash | AuthApiError::TokenIssue | AuthApiError::Users(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
