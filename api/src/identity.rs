use axum::http::{HeaderMap, StatusCode, request::Parts};

use crate::{
    App,
    error::{ApiRequestError, AppError},
};

pub const TOKEN_HEADER: &str = "x-auth-token";
pub const COOKIE_NAME: &str = "auth_token";

#[derive(thiserror::Error, Debug)]
pub enum AuthenticationError {
    #[error("No token, authorization denied")]
    NoToken,

    #[error("Token is not valid")]
    InvalidToken,
}

impl ApiRequestError for AuthenticationError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl From<AuthenticationError> for AppError {
    fn from(e: AuthenticationError) -> Self {
        AppError::Request {
            status: e.status_code(),
            msg: e.to_string(),
        }
    }
}

/// The header wins over the cookie when a client sends both.
fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return Some(token.to_owned());
    }

    let jar = axum_extra::extract::cookie::CookieJar::from_headers(headers);
    jar.get(COOKIE_NAME)
        .map(|c| c.value().to_owned())
        .filter(|t| !t.is_empty())
}

/// Id of the user owning the request's session token. Rejects with 401 when
/// there is no token or it does not resolve to an active session.
pub struct AuthUser(pub i32);

impl axum::extract::FromRequestParts<App> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &App) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or(AuthenticationError::NoToken)?;

        let user_id = state
            .stores
            .sessions
            .find_user_id(&token)
            .await?
            .ok_or(AuthenticationError::InvalidToken)?;

        tracing::debug!(user_id, "Authenticated request");

        Ok(AuthUser(user_id))
    }
}
