//! Cookie-based sessions. The `auth_token` cookie carries a signed, expiring
//! token bound to the member's email; nothing is stored server-side, so a
//! token stays valid until it expires even after logout.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{Extension, FromRequest, RequestParts, TypedHeader};
use axum::headers::Cookie;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use time::Duration;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::models::member::Member;
use crate::util::current_time;

pub const TOKEN_COOKIE: &str = "auth_token";

const TOKEN_LIFETIME: Duration = Duration::days(30);

#[derive(Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

/// Mints a session token for the given email, expiring after 30 days.
pub fn issue_token(email: &str, secret: &str) -> AppResult<String> {
    let claims = Claims {
        sub: email.to_owned(),
        exp: (current_time() + TOKEN_LIFETIME).unix_timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(Into::into)
}

/// The email a token was issued for, if the signature checks out and the
/// token hasn't expired.
pub fn verify_token(token: &str, secret: &str) -> Option<String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims.sub)
    .ok()
}

pub fn session_cookie(token: &str) -> String {
    format!("{}={}; HttpOnly; Path=/", TOKEN_COOKIE, token)
}

/// Overwrites the cookie with an empty value that expires immediately.
pub fn clear_session_cookie() -> String {
    format!("{}=; HttpOnly; Path=/; Max-Age=0", TOKEN_COOKIE)
}

async fn member_from_cookie<B: Send>(req: &mut RequestParts<B>) -> AppResult<Option<Member>> {
    let Extension(pool) = Extension::<MySqlPool>::from_request(req)
        .await
        .map_err(|err| AppError::BadRequest(err.to_string()))?;
    let Extension(config) = Extension::<Arc<AppConfig>>::from_request(req)
        .await
        .map_err(|err| AppError::BadRequest(err.to_string()))?;

    let cookies = Option::<TypedHeader<Cookie>>::from_request(req)
        .await
        .unwrap_or(None);
    let email = cookies
        .as_ref()
        .and_then(|TypedHeader(cookie)| cookie.get(TOKEN_COOKIE))
        .and_then(|token| verify_token(token, &config.secret_key));

    match email {
        Some(email) => Member::with_email_opt(&email, &pool).await,
        None => Ok(None),
    }
}

/// Optional identity for the public pages: an invalid or missing cookie just
/// means an anonymous viewer.
pub struct Viewer(pub Option<Member>);

#[async_trait]
impl<B: Send> FromRequest<B> for Viewer {
    type Rejection = AppError;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        Ok(Viewer(member_from_cookie(req).await?))
    }
}

/// Required identity: rejects with 401 when no valid session is present.
/// Role checks happen in the handlers via [`Member::require`].
pub struct LoggedIn(pub Member);

#[async_trait]
impl<B: Send> FromRequest<B> for LoggedIn {
    type Rejection = AppError;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        member_from_cookie(req)
            .await?
            .map(LoggedIn)
            .ok_or(AppError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "sekrit";

    #[test]
    fn tokens_round_trip() {
        let token = issue_token("kano@club.org", SECRET).unwrap();
        assert_eq!(
            verify_token(&token, SECRET).as_deref(),
            Some("kano@club.org")
        );
    }

    #[test]
    fn tokens_signed_with_another_secret_are_rejected() {
        let token = issue_token("kano@club.org", "other-secret").unwrap();
        assert_eq!(verify_token(&token, SECRET), None);
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let claims = Claims {
            sub: "kano@club.org".to_owned(),
            exp: (current_time() - Duration::days(2)).unix_timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(verify_token(&token, SECRET), None);
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        assert_eq!(verify_token("not-a-token", SECRET), None);
    }
}
