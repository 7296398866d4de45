use crate::errors::AppError;
use crate::models::{Session, User};
use crate::state::AppState;
use crate::store::AppData;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use chrono::Utc;
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email and password are required")]
    MissingCredentials,
    #[error("email is already registered")]
    EmailTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("not signed in")]
    SessionMissing,
}

/// Outcome of a successful sign-up or sign-in, ready for the wire.
#[derive(Debug)]
pub struct AuthSuccess {
    pub email: String,
    pub token: String,
}

pub fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

pub fn sign_up(data: &mut AppData, email: &str, password: &str) -> Result<AuthSuccess, AuthError> {
    let email = normalize_email(email);
    if email.is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    if data.users.iter().any(|user| user.email == email) {
        return Err(AuthError::EmailTaken);
    }

    let salt = Uuid::new_v4().simple().to_string();
    let user = User {
        id: data.allocate_user_id(),
        email: email.clone(),
        password_hash: hash_password(&salt, password),
        password_salt: salt,
        created_at: Utc::now(),
    };
    let user_id = user.id;
    data.users.push(user);

    Ok(open_session(data, user_id, email))
}

pub fn sign_in(data: &mut AppData, email: &str, password: &str) -> Result<AuthSuccess, AuthError> {
    let email = normalize_email(email);
    let user = data
        .users
        .iter()
        .find(|user| user.email == email)
        .ok_or(AuthError::InvalidCredentials)?;
    if hash_password(&user.password_salt, password) != user.password_hash {
        return Err(AuthError::InvalidCredentials);
    }

    let user_id = user.id;
    Ok(open_session(data, user_id, email))
}

pub fn sign_out(data: &mut AppData, token: &str) {
    data.sessions.retain(|session| session.token != token);
}

pub fn session_user<'a>(data: &'a AppData, token: &str) -> Option<&'a User> {
    let session = data.sessions.iter().find(|session| session.token == token)?;
    data.users.iter().find(|user| user.id == session.user_id)
}

fn open_session(data: &mut AppData, user_id: u64, email: String) -> AuthSuccess {
    let token = Uuid::new_v4().to_string();
    data.sessions.push(Session {
        token: token.clone(),
        user_id,
        created_at: Utc::now(),
    });
    AuthSuccess { email, token }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Pulls the session token out of a request: bearer header for API
/// clients, cookie for the browser pages.
pub fn request_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        if let Ok(value) = value.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Some(token.trim().to_string());
            }
        }
    }

    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        pair.trim()
            .strip_prefix(SESSION_COOKIE)?
            .strip_prefix('=')
            .map(str::to_string)
    })
}

/// Session guard for the `/api` routes. A missing or unknown token is a
/// terminal 401 for the request; the pages redirect to the login view on
/// their own when they see it.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: u64,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = request_token(&parts.headers).ok_or(AuthError::SessionMissing)?;
        let data = state.data.lock().await;
        let user = session_user(&data, &token).ok_or(AuthError::SessionMissing)?;
        Ok(CurrentUser {
            id: user.id,
            email: user.email.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn hashes_depend_on_salt_and_password() {
        let hash = hash_password("salt-a", "hunter2");
        assert_eq!(hash, hash_password("salt-a", "hunter2"));
        assert_ne!(hash, hash_password("salt-b", "hunter2"));
        assert_ne!(hash, hash_password("salt-a", "hunter3"));
    }

    #[test]
    fn sign_up_then_sign_in() {
        let mut data = AppData::default();
        let created = sign_up(&mut data, "Ada@Example.com", "hunter2").unwrap();
        assert_eq!(created.email, "ada@example.com");
        assert!(session_user(&data, &created.token).is_some());

        let signed_in = sign_in(&mut data, "ada@example.com", "hunter2").unwrap();
        assert_ne!(signed_in.token, created.token);

        let err = sign_in(&mut data, "ada@example.com", "wrong").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn duplicate_email_is_rejected_case_insensitively() {
        let mut data = AppData::default();
        sign_up(&mut data, "ada@example.com", "hunter2").unwrap();
        let err = sign_up(&mut data, "ADA@example.com", "other").unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[test]
    fn blank_credentials_are_rejected() {
        let mut data = AppData::default();
        assert!(matches!(
            sign_up(&mut data, "  ", "hunter2"),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            sign_up(&mut data, "ada@example.com", ""),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn sign_out_invalidates_the_token() {
        let mut data = AppData::default();
        let session = sign_up(&mut data, "ada@example.com", "hunter2").unwrap();
        sign_out(&mut data, &session.token);
        assert!(session_user(&data, &session.token).is_none());
    }

    #[test]
    fn token_comes_from_bearer_or_cookie() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_token(&headers), None);

        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=abc123"),
        );
        assert_eq!(request_token(&headers), Some("abc123".to_string()));

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer def456"),
        );
        assert_eq!(request_token(&headers), Some("def456".to_string()));
    }
}
