use axum::body::Body;
use axum::extract::State;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::Response;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::state::AppState;
use gazette_infra::db::users_repo;

pub const SESSION_COOKIE: &str = "gazette_session";

#[derive(Debug, Clone)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
}

/// Request extension carrying the resolved identity; `None` is anonymous.
#[derive(Debug, Clone, Default)]
pub struct AuthSession(pub Option<SessionUser>);

impl AuthSession {
    pub fn user(&self) -> Option<&SessionUser> {
        self.0.as_ref()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.0.as_ref().map(|user| user.id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: i64,
    exp: i64,
}

/// Resolves the session cookie into an `AuthSession` extension.
///
/// A missing secret, a tampered or expired token, and a token whose user
/// no longer exists all resolve to anonymous; this middleware never
/// rejects a request.
pub async fn resolve_session(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let session = authenticate(&state, request.headers()).await;
    request.extensions_mut().insert(session);
    next.run(request).await
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> AuthSession {
    let Some(secret) = state
        .config
        .session_secret
        .as_deref()
        .filter(|value| !value.is_empty())
    else {
        return AuthSession(None);
    };
    let Some(token) = extract_cookie(headers, SESSION_COOKIE) else {
        return AuthSession(None);
    };
    let Some(user_id) = verify_session_token(secret, &token) else {
        return AuthSession(None);
    };
    match users_repo::find_user_by_id(&state.db, user_id).await {
        Ok(Some(user)) => AuthSession(Some(SessionUser {
            id: user.id,
            username: user.username,
        })),
        Ok(None) => AuthSession(None),
        Err(err) => {
            tracing::warn!(error = %err, "session user lookup failed");
            AuthSession(None)
        }
    }
}

pub fn issue_session_token(
    secret: &str,
    user_id: i64,
    max_age_secs: i64,
) -> Result<String, serde_json::Error> {
    let exp = Utc::now().timestamp().saturating_add(max_age_secs);
    let claims = SessionClaims { sub: user_id, exp };
    let json = serde_json::to_vec(&claims)?;
    let claims_b64 = URL_SAFE_NO_PAD.encode(json);
    let signature = sign(secret, &claims_b64);
    Ok(format!("{claims_b64}.{signature}"))
}

pub fn verify_session_token(secret: &str, token: &str) -> Option<i64> {
    let (claims_b64, signature) = token.split_once('.')?;
    if claims_b64.is_empty() || signature.is_empty() {
        return None;
    }
    if signature != sign(secret, claims_b64) {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD.decode(claims_b64.as_bytes()).ok()?;
    let claims: SessionClaims = serde_json::from_slice(&bytes).ok()?;
    (claims.exp > Utc::now().timestamp()).then_some(claims.sub)
}

fn sign(secret: &str, payload: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .expect("hmac can take key of any size");
    mac.update(payload.as_bytes());
    URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
}

pub fn build_session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

pub fn attach_cookie(mut response: Response, cookie_value: String) -> Response {
    if let Ok(value) = cookie_value.parse() {
        response.headers_mut().append(SET_COOKIE, value);
    }
    response
}

pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(COOKIE)?.to_str().ok()?;
    for part in header.split(';') {
        let trimmed = part.trim();
        let mut iter = trimmed.splitn(2, '=');
        let key = iter.next()?.trim();
        let value = iter.next()?.trim();
        if key == name {
            return Some(value.to_string());
        }
    }
    None
}

pub fn is_https(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get("x-forwarded-proto") else {
        return false;
    };
    let Ok(value) = value.to_str() else {
        return false;
    };
    value
        .split(',')
        .any(|part| part.trim().eq_ignore_ascii_case("https"))
}

#[cfg(test)]
mod tests {
    use axum::http::header::COOKIE;
    use axum::http::HeaderMap;

    use super::{
        build_session_cookie, clear_session_cookie, extract_cookie, issue_session_token,
        verify_session_token, SESSION_COOKIE,
    };

    #[test]
    fn token_round_trip() {
        let token = issue_session_token("secret", 42, 60).unwrap();
        assert_eq!(verify_session_token("secret", &token), Some(42));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = issue_session_token("secret", 42, -60).unwrap();
        assert_eq!(verify_session_token("secret", &token), None);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_session_token("secret", 42, 60).unwrap();
        assert_eq!(verify_session_token("other", &token), None);
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert_eq!(verify_session_token("secret", "not-a-token"), None);
        assert_eq!(verify_session_token("secret", "."), None);
    }

    #[test]
    fn build_cookie_includes_flags_and_age() {
        let cookie = build_session_cookie("token", 60, false);
        assert!(cookie.starts_with("gazette_session=token"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=60"));
        assert!(!cookie.contains("Secure"));
        assert!(build_session_cookie("token", 60, true).contains("Secure"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }

    #[test]
    fn extract_cookie_finds_named_value() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, "a=1; gazette_session=tok; b=2".parse().unwrap());
        assert_eq!(
            extract_cookie(&headers, SESSION_COOKIE),
            Some("tok".to_string())
        );
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }
}
