//! Cookie handling and request extractors

use axum::{
    extract::{FromRequest, FromRequestParts, Request},
    http::{header, request::Parts, HeaderMap},
    Form, Json,
};

use crate::api::SharedState;
use crate::auth::error::AuthError;
use crate::auth::models::{Account, LoginRequest};
use crate::auth::session::{Session, SESSION_TTL_SECS};
use crate::config::SessionConfig;

/// How the session cookie is named and flagged
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    pub secure: bool,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            name: "session".to_string(),
            secure: true,
        }
    }
}

impl From<&SessionConfig> for CookieSettings {
    fn from(config: &SessionConfig) -> Self {
        Self {
            name: config.cookie_name.clone(),
            secure: config.secure_cookie,
        }
    }
}

impl CookieSettings {
    /// `Set-Cookie` value carrying a fresh session token
    pub fn session_cookie(&self, token: &str) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            self.name, token, SESSION_TTL_SECS
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// `Set-Cookie` value that makes the browser drop the session cookie
    pub fn clear_cookie(&self) -> String {
        let mut cookie = format!(
            "{}=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; SameSite=Lax",
            self.name
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Extract the session token from the request's `Cookie` headers
pub fn token_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| name.trim() == cookie_name)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// The account behind a valid session cookie. Rejects with `Unauthenticated`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub account: Account,
    pub session: Session,
}

impl FromRequestParts<SharedState> for CurrentUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers, &state.cookies.name)
            .ok_or(AuthError::Unauthenticated)?;

        let session = state
            .sessions
            .resolve(&token)
            .await
            .ok_or(AuthError::Unauthenticated)?;

        // A session for an account that no longer exists is not a session
        let account = state
            .credentials
            .find_account_by_id(session.user_id)
            .cloned()
            .ok_or(AuthError::Unauthenticated)?;

        Ok(CurrentUser { account, session })
    }
}

/// Login credentials from either a JSON or a urlencoded form body
#[derive(Debug, Clone)]
pub struct LoginBody(pub LoginRequest);

impl<S> FromRequest<S> for LoginBody
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        let parsed = if is_form {
            Form::<LoginRequest>::from_request(req, state)
                .await
                .map(|Form(body)| body)
                .map_err(|e| e.to_string())
        } else {
            Json::<LoginRequest>::from_request(req, state)
                .await
                .map(|Json(body)| body)
                .map_err(|e| e.to_string())
        };

        parsed.map(LoginBody).map_err(|reason| {
            tracing::debug!("Rejected login body: {}", reason);
            AuthError::MalformedRequest
        })
    }
}
